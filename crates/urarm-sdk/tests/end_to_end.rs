//! 端到端测试：后台状态轮询 + 指令派发

use std::sync::Arc;
use std::time::{Duration, Instant};

use urarm_sdk::prelude::*;
use urarm_sdk::protocol::PrimitiveKind;

fn wait_for<F: Fn() -> bool>(condition: F, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn test_poller_feeds_dispatcher() {
    let (publisher, source) = status_channel(4);
    let watch = publisher.watch();

    let poller = StatusPoller::spawn(
        || -> Result<Option<StatusSnapshot>, DriverError> {
            std::thread::sleep(Duration::from_millis(1));
            Ok(Some(StatusSnapshot::uniform(RobotMode::Running, JointMode::Running)))
        },
        publisher,
        Duration::from_millis(1),
    )
    .unwrap();
    assert!(wait_for(|| watch.latest().is_some(), Duration::from_secs(2)));

    let mut dispatcher = CommandDispatcher::new(
        Arc::new(DispatcherConfig::default()),
        Vec::new(),
        source,
        MotionPrimitiveSlot::new(),
    );

    let result = dispatcher
        .dispatch(&ArmCommand::MoveCam {
            pan: Deg(5.0),
            tilt: Deg(10.0),
            height: Meter(0.4),
        })
        .unwrap();
    assert!(result.ok, "{}", result);
    assert_eq!(dispatcher.primitive().read().kind, PrimitiveKind::MoveCam);

    // 停止轮询后通道关闭，读到的缓冲快照用尽后派发返回协作层错误
    poller.stop();
    let command = ArmCommand::MoveJoints {
        angles: [Deg(0.0); 6],
    };
    let outcome = match dispatcher.dispatch(&command) {
        Ok(_) => dispatcher.dispatch(&command),
        Err(e) => Err(e),
    };
    assert!(matches!(outcome, Err(DriverError::ChannelClosed)));

    // 不读取状态的指令仍可发出
    assert!(dispatcher.dispatch(&ArmCommand::Brakes { enable: true }).unwrap().ok);
    assert_eq!(dispatcher.sink().lines(), vec!["stopj([0,0,0,0,0,0])"]);
}

#[test]
fn test_json_command_stream() {
    let (publisher, source) = status_channel(4);
    publisher
        .publish(StatusSnapshot::uniform(RobotMode::Initializing, JointMode::Initializing))
        .unwrap();

    let mut dispatcher = CommandDispatcher::new(
        Arc::new(DispatcherConfig::default()),
        Vec::new(),
        source,
        MotionPrimitiveSlot::new(),
    );

    let input = r#"
        {"command":"power","is_on":true}
        {"command":"joint_move","joint_id":2,"dir":false}
        {"command":"set_position","name":"home"}
    "#;
    let results: Vec<DispatchResult> = input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let command: ArmCommand = serde_json::from_str(line.trim()).unwrap();
            dispatcher.dispatch(&command).unwrap()
        })
        .collect();

    assert!(results[0].ok);
    assert!(results[1].ok);
    assert_eq!(results[2].error_kind, Some(ErrorKind::InvalidRobotState));
    assert_eq!(
        dispatcher.sink().lines(),
        vec!["power on", "speedj_init([0,0,-0.05,0,0,0],0.05,0.02)"]
    );
}
