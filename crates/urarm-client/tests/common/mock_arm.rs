//! 模拟机械臂
//!
//! 根据收到的文本指令推进关节状态，并作为状态来源返回快照。

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use urarm_client::AutoInitConfig;
use urarm_driver::{CancellationToken, DriverError, Sleeper, StatusSource};
use urarm_protocol::{Joint, JointMode, RobotMode, StatusSnapshot};

/// 初始化指令发出后关节的速度（rad/s）
pub const MOVING_VELOCITY: f64 = 0.1;

#[derive(Debug)]
struct ArmState {
    status: StatusSnapshot,
    lines: Vec<String>,
    reads: usize,
    /// 收到初始化指令后多少次读取后收敛
    settle_polls: usize,
    /// 正在运动的关节及剩余读取次数
    moving: Option<(Joint, usize)>,
    /// 永不收敛的关节
    stuck: Option<Joint>,
    /// 状态流无数据
    silent: bool,
    /// 第 N 次读取时触发取消
    cancel_on_read: Option<(usize, CancellationToken)>,
    init_commands: [String; 6],
}

impl ArmState {
    fn on_line(&mut self, line: String) {
        if let Some(index) = self.init_commands.iter().position(|c| c == &line)
            && let Some(joint) = Joint::from_index(index)
        {
            self.status = self.status.with_joint_velocity(joint, MOVING_VELOCITY);
            self.moving = Some((joint, self.settle_polls));
        }
        self.lines.push(line);
    }

    fn advance(&mut self) {
        if let Some((joint, remaining)) = self.moving {
            if self.stuck == Some(joint) {
                return;
            }
            if remaining == 0 {
                self.status = self
                    .status
                    .with_joint_velocity(joint, 0.0)
                    .with_joint_mode(joint, JointMode::Running);
                self.moving = None;
            } else {
                self.moving = Some((joint, remaining - 1));
            }
        }
    }
}

/// 模拟机械臂（克隆共享同一状态）
#[derive(Debug, Clone)]
pub struct MockArm {
    state: Arc<Mutex<ArmState>>,
}

impl MockArm {
    pub fn new(status: StatusSnapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(ArmState {
                status,
                lines: Vec::new(),
                reads: 0,
                settle_polls: 2,
                moving: None,
                stuck: None,
                silent: false,
                cancel_on_read: None,
                init_commands: AutoInitConfig::default().joint_commands,
            })),
        }
    }

    /// 整机与全部关节处于 running
    pub fn running() -> Self {
        Self::new(StatusSnapshot::uniform(RobotMode::Running, JointMode::Running))
    }

    /// 整机与全部关节处于 initializing
    pub fn initializing() -> Self {
        Self::new(StatusSnapshot::uniform(
            RobotMode::Initializing,
            JointMode::Initializing,
        ))
    }

    pub fn set_status(&self, status: StatusSnapshot) {
        self.state.lock().unwrap().status = status;
    }

    pub fn set_stuck(&self, joint: Joint) {
        self.state.lock().unwrap().stuck = Some(joint);
    }

    pub fn set_silent(&self, silent: bool) {
        self.state.lock().unwrap().silent = silent;
    }

    pub fn cancel_on_read(&self, read: usize, token: CancellationToken) {
        self.state.lock().unwrap().cancel_on_read = Some((read, token));
    }

    /// 已收到的指令行
    pub fn lines(&self) -> Vec<String> {
        self.state.lock().unwrap().lines.clone()
    }

    pub fn reads(&self) -> usize {
        self.state.lock().unwrap().reads
    }

    pub fn status(&self) -> StatusSnapshot {
        self.state.lock().unwrap().status
    }

    /// 指令链路（写端）
    pub fn link(&self) -> MockLink {
        MockLink {
            state: self.state.clone(),
            buffer: Vec::new(),
        }
    }

    /// 状态来源（读端）
    pub fn source(&self) -> MockStatus {
        MockStatus {
            state: self.state.clone(),
        }
    }
}

/// 换行分隔的指令链路
#[derive(Debug)]
pub struct MockLink {
    state: Arc<Mutex<ArmState>>,
    buffer: Vec<u8>,
}

impl Write for MockLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            self.state.lock().unwrap().on_line(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 状态来源：每次读取推进一步模拟
#[derive(Debug)]
pub struct MockStatus {
    state: Arc<Mutex<ArmState>>,
}

impl StatusSource for MockStatus {
    fn try_next(&mut self) -> Result<Option<StatusSnapshot>, DriverError> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        if let Some((at, token)) = &state.cancel_on_read
            && state.reads >= *at
        {
            token.cancel();
        }
        if state.silent {
            return Ok(None);
        }
        state.advance();
        Ok(Some(state.status))
    }
}

/// 记录休眠次数与总时长，不实际休眠
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    count: Arc<AtomicU64>,
    total_us: Arc<AtomicU64>,
}

impl RecordingSleeper {
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> Duration {
        Duration::from_micros(self.total_us.load(Ordering::Relaxed))
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }
}
