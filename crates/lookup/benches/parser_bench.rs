//! 출력 파서 벤치마크
//!
//! 마커 라인, plain 라인, 혼합 스캔 출력의 파싱 처리량을 측정합니다.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sleuth_lookup::{LineMatcher, MarkedLineMatcher, OutputParser, PlainLineMatcher};

/// 마커가 붙은 hit 한 줄
const MARKED_LINE: &str = "[+] GitHub: https://github.com/benchuser";

/// 마커 없는 hit 한 줄
const PLAIN_LINE: &str = "GitHub: https://github.com/benchuser";

/// 마커 형식의 전체 스캔 출력 (노이즈 라인 포함)
const MARKED_OUTPUT: &str = "\
[*] Checking username benchuser on:

[+] GitHub: https://github.com/benchuser
[+] Reddit: https://www.reddit.com/user/benchuser
[+] Twitter: https://twitter.com/benchuser
[+] Instagram: https://www.instagram.com/benchuser
[+] Telegram: https://t.me/benchuser
[+] Stack Overflow: https://stackoverflow.com/users/benchuser
[+] Hacker News: https://news.ycombinator.com/user?id=benchuser
[+] npm: https://www.npmjs.com/~benchuser

[*] Search completed with 8 results
";

/// plain 형식의 전체 스캔 출력
const PLAIN_OUTPUT: &str = "\
GitHub: https://github.com/benchuser
Reddit: https://www.reddit.com/user/benchuser
Twitter: https://twitter.com/benchuser
Instagram: https://www.instagram.com/benchuser
Telegram: https://t.me/benchuser
Stack Overflow: https://stackoverflow.com/users/benchuser
Hacker News: https://news.ycombinator.com/user?id=benchuser
npm: https://www.npmjs.com/~benchuser
";

fn bench_marked_output(c: &mut Criterion) {
    let parser = OutputParser::new();

    let mut group = c.benchmark_group("marked_output");

    // 한 줄
    group.throughput(Throughput::Elements(1));
    group.bench_function("single_line", |b| {
        b.iter(|| parser.parse(black_box(MARKED_LINE)))
    });

    // 전체 스캔 출력
    group.bench_function("full_scan", |b| {
        b.iter(|| parser.parse(black_box(MARKED_OUTPUT)))
    });

    // 1000건 반복 처리량
    group.throughput(Throughput::Elements(1000));
    group.bench_function("throughput_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                parser.parse(black_box(MARKED_LINE));
            }
        })
    });

    group.finish();
}

fn bench_plain_output(c: &mut Criterion) {
    let parser = OutputParser::new();

    let mut group = c.benchmark_group("plain_output");

    // 한 줄 (마커 매처를 거친 뒤 plain 매처에 도달)
    group.throughput(Throughput::Elements(1));
    group.bench_function("single_line", |b| {
        b.iter(|| parser.parse(black_box(PLAIN_LINE)))
    });

    // 전체 스캔 출력
    group.bench_function("full_scan", |b| {
        b.iter(|| parser.parse(black_box(PLAIN_OUTPUT)))
    });

    // 1000건 반복 처리량
    group.throughput(Throughput::Elements(1000));
    group.bench_function("throughput_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                parser.parse(black_box(PLAIN_LINE));
            }
        })
    });

    group.finish();
}

fn bench_matcher_comparison(c: &mut Criterion) {
    let marked = MarkedLineMatcher;
    let plain = PlainLineMatcher;

    let mut group = c.benchmark_group("matcher_comparison");
    group.throughput(Throughput::Elements(1000));

    group.bench_with_input(
        BenchmarkId::new("matcher", "marked"),
        &MARKED_LINE,
        |b, &input| {
            b.iter(|| {
                for _ in 0..1000 {
                    marked.try_match(black_box(input));
                }
            })
        },
    );

    group.bench_with_input(
        BenchmarkId::new("matcher", "plain"),
        &PLAIN_LINE,
        |b, &input| {
            b.iter(|| {
                for _ in 0..1000 {
                    plain.try_match(black_box(input));
                }
            })
        },
    );

    group.finish();
}

criterion_group!(
    benches,
    bench_marked_output,
    bench_plain_output,
    bench_matcher_comparison
);
criterion_main!(benches);
