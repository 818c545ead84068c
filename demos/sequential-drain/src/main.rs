//! Sequential drain demo
//!
//! Submits a burst of sleeping jobs to a fixed-size pool and waits for all
//! of them to finish, printing the pool's advisory stats along the way.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use workpool::{init_logging, Pool};

fn main() {
    init_logging();
    println!("=== workpool: sequential drain ===\n");

    let workers = 4;
    let jobs = 40;
    let job_sleep = Duration::from_millis(500);

    let pool = Pool::fixed(workers).expect("failed to start pool");
    println!("pool started with {} workers", pool.num_alive());

    let completed = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    for i in 0..jobs {
        let completed = completed.clone();
        pool.add_work(move || {
            std::thread::sleep(job_sleep);
            completed.fetch_add(1, Ordering::SeqCst);
            println!("job {i} done (total completed: {})", completed.load(Ordering::SeqCst));
        })
        .expect("submission rejected");
    }

    println!("submitted {jobs} jobs, waiting for drain...");
    pool.wait();

    println!(
        "\nall {} jobs completed in {:?}, stats={:?}",
        completed.load(Ordering::SeqCst),
        start.elapsed(),
        pool.stats()
    );
}
