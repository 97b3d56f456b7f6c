//! Benchmark suite for per-user lock contention
//!
//! Compares charging one hot user from many threads with spreading the same
//! number of charges over many users, using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use rust_points_engine::BalanceEngine;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const CHARGES_PER_THREAD: usize = 1000;

fn main() {
    divan::main();
}

/// Charge from `THREADS` threads, spreading requests over `users` users
fn charge_from_threads(engine: Arc<BalanceEngine>, users: u64) {
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..CHARGES_PER_THREAD {
                    let user_id = ((t * CHARGES_PER_THREAD + i) as u64) % users;
                    let snapshot = engine.get_balance(user_id);
                    let _ = engine.charge(&snapshot, 1);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }
}

fn enrolled_engine(users: u64) -> Arc<BalanceEngine> {
    let engine = BalanceEngine::new();
    for user_id in 0..users {
        engine.enroll(user_id, 0).expect("enroll failed");
    }
    Arc::new(engine)
}

/// All threads fight over a single user's lock
#[divan::bench]
fn single_user(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| enrolled_engine(1))
        .bench_values(|engine| charge_from_threads(engine, 1));
}

/// Threads spread over many users and rarely meet on a lock
#[divan::bench(args = [8, 64, 1024])]
fn many_users(bencher: divan::Bencher, users: u64) {
    bencher
        .with_inputs(|| enrolled_engine(users))
        .bench_values(|engine| charge_from_threads(engine, users));
}

/// Sequential baseline without any contention
#[divan::bench]
fn single_thread(bencher: divan::Bencher) {
    bencher.with_inputs(|| enrolled_engine(1)).bench_values(|engine| {
        for _ in 0..THREADS * CHARGES_PER_THREAD {
            let snapshot = engine.get_balance(0);
            let _ = engine.charge(&snapshot, 1);
        }
    });
}
