#[macro_use] extern crate log;
#[macro_use] extern crate crossbeam_channel;
extern crate env_logger;
extern crate chrono;

mod follower;

use std::io::Write;
use chrono::prelude::{DateTime, Local};


fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            writeln!(buf, "{:5}: {} - {}", record.level(), now.format("%H:%M:%S.%3f").to_string(), record.args())
        })
        .init();
}

fn main() {
    init_logger();

    info!("Stand-alone Smoke test started");

    follower::run();

    info!("Stand-alone Smoke test completed");
}
