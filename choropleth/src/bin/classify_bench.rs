use choropleth::compute_breaks;
use std::time::Instant;

// Skewed sample resembling summed priority scores: many low segments, a long tail.
fn build_sample(n: usize, seed: u64) -> Vec<f64> {
    let mut s = seed;
    let mut rnd = || { s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407); ((s >> 11) as f64) / ((1u64 << 53) as f64) };
    (0..n).map(|_| { let u = rnd(); 9.0 * u * u * u + rnd() * 0.05 }).collect()
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut n = 5000usize;
    let mut k = 5usize;
    let mut runs = 5usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--n=") { if let Ok(v)=val.parse() { n=v; } }
        else if let Some(val)=a.strip_prefix("--k=") { if let Ok(v)=val.parse() { k=v; } }
        else if let Some(val)=a.strip_prefix("--runs=") { if let Ok(v)=val.parse() { runs=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }
    let runs = runs.max(1);

    let sample = build_sample(n, 0x5eed_1234_abcd_0001);
    let mut times_ms: Vec<f64> = Vec::with_capacity(runs);
    let mut last = None;
    for _ in 0..runs {
        let t0 = Instant::now();
        last = compute_breaks(&sample, k);
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    times_ms.sort_by(f64::total_cmp);
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let breaks = last.map(|b| format!("{:?}", b.as_slice())).unwrap_or_else(|| "none".to_string());
    println!("n={} k={} runs={} median_ms={:.3} p90_ms={:.3} breaks={}", n, k, runs, med, p90, breaks);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.3} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
