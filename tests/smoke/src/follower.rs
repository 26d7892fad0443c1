use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvError, Sender};
use election_timer::{DeadlineSignal, TimeoutNotification, TimerConfiguration};

const ELECTION_TIMEOUT: Duration = Duration::from_millis(100);
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(20);
const HEARTBEAT_COUNT: u32 = 10;
const MAX_ELECTIONS: u32 = 3;

enum FollowerEvent {
    Heartbeat(Result<u32, RecvError>),
    ElectionTimeout(Result<TimeoutNotification, RecvError>),
}

struct FollowerStats {
    heartbeats: u32,
    elections: u32,
    elections_before_leader_crash: u32,
}

pub fn run() {
    info!("Follower election smoke case started");

    let timer = DeadlineSignal::with_configuration(
        TimerConfiguration::new(ELECTION_TIMEOUT).with_name("follower-1-election"),
    )
    .expect("can create election timer");

    let (heartbeat_tx, heartbeat_rx): (Sender<u32>, Receiver<u32>) = crossbeam_channel::unbounded();
    let leader = thread::spawn(move || send_heartbeats(heartbeat_tx));

    timer.reset();
    let stats = follow_leader(&timer, heartbeat_rx);
    leader.join().expect("leader thread exits");

    assert_eq!(HEARTBEAT_COUNT, stats.heartbeats);
    assert_eq!(0, stats.elections_before_leader_crash);
    assert_eq!(MAX_ELECTIONS, stats.elections);
    assert!(timer.is_stopped());

    check_paused_leader();

    info!("Follower election smoke case completed");
}

fn send_heartbeats(heartbeat_tx: Sender<u32>) {
    for heartbeat in 1..=HEARTBEAT_COUNT {
        thread::sleep(HEARTBEAT_INTERVAL);
        if heartbeat_tx.send(heartbeat).is_err() {
            error!("Follower is not listening for heartbeats");
            return;
        }
    }
    info!("Leader crashed after {} heartbeats", HEARTBEAT_COUNT);
}

fn follow_leader(timer: &DeadlineSignal, heartbeat_rx: Receiver<u32>) -> FollowerStats {
    let election_timeout_rx = timer.receiver();
    let mut heartbeat_rx = heartbeat_rx;
    let mut leader_alive = true;
    let mut stats = FollowerStats {
        heartbeats: 0,
        elections: 0,
        elections_before_leader_crash: 0,
    };

    loop {
        let event = select!(
            recv(heartbeat_rx) -> res => FollowerEvent::Heartbeat(res),
            recv(election_timeout_rx) -> res => FollowerEvent::ElectionTimeout(res),
        );

        match event {
            FollowerEvent::Heartbeat(Ok(heartbeat)) => {
                trace!("Heartbeat {} received", heartbeat);
                stats.heartbeats += 1;
                timer.reset();
            }
            FollowerEvent::Heartbeat(Err(_)) => {
                leader_alive = false;
                heartbeat_rx = crossbeam_channel::never();
            }
            FollowerEvent::ElectionTimeout(Ok(notification)) => {
                stats.elections += 1;
                if leader_alive {
                    stats.elections_before_leader_crash += 1;
                }
                info!("Leader awaiting time elapsed ({}). Starting new election", notification);

                if stats.elections >= MAX_ELECTIONS {
                    timer.stop();
                } else {
                    timer.reset();
                }
            }
            FollowerEvent::ElectionTimeout(Err(_)) => {
                info!("Election timer stopped");
                break;
            }
        }
    }

    stats
}

fn check_paused_leader() {
    let timer = DeadlineSignal::with_configuration(
        TimerConfiguration::new(Duration::from_millis(30)).with_name("leader-1-election"),
    )
    .expect("can create election timer");
    let election_timeout_rx = timer.receiver();

    timer.reset();
    // elected: a leader does not watch for heartbeats
    timer.pause();

    let paused_at = Instant::now();
    let result = election_timeout_rx.recv_timeout(Duration::from_millis(200));
    assert!(result.is_err(), "Paused timer fired");
    info!("Paused timer stayed silent for {:?}", paused_at.elapsed());

    timer.reset();
    let notification = election_timeout_rx
        .recv_timeout(Duration::from_millis(500))
        .expect("timer fires after reset");
    info!("Stepped down to follower and timed out: {}", notification);

    timer.stop();
    assert!(election_timeout_rx.recv().is_err());
}
