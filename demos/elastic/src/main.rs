//! Elastic pool demo
//!
//! Submits a burst of one-second jobs to an elastic pool and polls
//! `Pool::stats()` so the manager's grow/shrink decisions are visible as
//! they happen.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use workpool::{init_logging, Pool, PoolConfig};

fn main() {
    init_logging();
    println!("=== workpool: elastic growth and shrink ===\n");

    let config = PoolConfig::elastic(3, 10).queue_capacity(200);
    let pool = Pool::new(config).expect("failed to start pool");
    println!("pool started with {} workers (min=3, max=10)", pool.num_alive());

    let completed = Arc::new(AtomicUsize::new(0));
    let total = 100;
    for _ in 0..total {
        let completed = completed.clone();
        pool.add_work(move || {
            std::thread::sleep(Duration::from_secs(1));
            completed.fetch_add(1, Ordering::SeqCst);
        })
        .expect("submission rejected");
    }
    println!("submitted {total} one-second jobs\n");

    while completed.load(Ordering::SeqCst) < total {
        println!("{:?}", pool.stats());
        std::thread::sleep(Duration::from_millis(500));
    }
    println!("\nall {total} jobs completed: {:?}", pool.stats());

    println!("\nwaiting to observe the manager shrink back toward min...");
    for _ in 0..10 {
        println!("alive={}", pool.num_alive());
        if pool.num_alive() == 3 {
            break;
        }
        std::thread::sleep(Duration::from_secs(1));
    }

    pool.destroy();
    println!("destroyed");
}
