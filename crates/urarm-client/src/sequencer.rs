//! # 关节自动初始化
//!
//! 按关节 5 → 0 的顺序逐个初始化（外侧关节先收敛）：
//!
//! ```text
//! 前置条件：robot_mode == initializing
//!   ↓
//! for joint in 5..=0:
//!   while joint_mode == initializing:
//!     发送该关节的低速初始化指令
//!     轮询状态直到 |velocity| <= 阈值（有界重试）
//!   joint_mode == running → 下一个关节（被取消时也计入已完成）
//!   否则 → JointFailed
//!   ↓
//! 被取消 → 发送全零低速停止指令，返回已完成/未完成的关节
//! ```
//!
//! 取消在每个关节循环、每次指令重发和每次收敛轮询的开头检查。

use crate::config::AutoInitConfig;
use crate::error::CommandError;
use std::io::Write;
use thiserror::Error;
use tracing::{error, info, trace, warn};
use urarm_driver::{
    CancellationToken, CommandSink, DriverError, RetryPolicy, Sleeper, StatusSource, read_status,
};
use urarm_protocol::{ControllerCommand, Joint, JointMode, RobotMode, StatusSnapshot};

/// 自动初始化错误
#[derive(Error, Debug)]
pub enum AutoInitError {
    /// 进入时整机不在初始化模式，未发出任何指令
    #[error("robot mode {mode} expected: {}", RobotMode::Initializing)]
    NotInitializing { mode: RobotMode },

    /// 关节未能进入 running
    #[error("failed to auto initialise joint {}, joint mode: {mode}", joint.index())]
    JointFailed { joint: Joint, mode: JointMode },

    /// 状态读取重试耗尽
    #[error("status unavailable during auto initialisation: {0}")]
    StatusUnavailable(#[source] DriverError),

    #[error(transparent)]
    Driver(DriverError),
}

impl From<AutoInitError> for CommandError {
    fn from(err: AutoInitError) -> Self {
        match err {
            AutoInitError::NotInitializing { .. } => CommandError::InvalidRobotState(err.to_string()),
            AutoInitError::JointFailed { .. } | AutoInitError::StatusUnavailable(_) => {
                CommandError::Failure(err.to_string())
            },
            AutoInitError::Driver(e) => CommandError::Driver(e),
        }
    }
}

impl From<DriverError> for AutoInitError {
    fn from(err: DriverError) -> Self {
        if err.is_status_timeout() {
            AutoInitError::StatusUnavailable(err)
        } else {
            AutoInitError::Driver(err)
        }
    }
}

/// 自动初始化结果
#[derive(Debug, Clone, PartialEq)]
pub struct AutoInitReport {
    /// 已确认进入 running 的关节（按处理顺序）
    pub completed: Vec<Joint>,
    /// 是否被取消
    pub cancelled: bool,
    /// 发出的指令条数（含取消时的停止指令）
    pub commands_sent: u32,
}

impl AutoInitReport {
    /// 尚未完成的关节（按处理顺序）
    pub fn pending(&self) -> Vec<Joint> {
        Joint::ALL
            .iter()
            .rev()
            .copied()
            .filter(|joint| !self.completed.contains(joint))
            .collect()
    }

    /// 全部六个关节都已完成
    pub fn is_complete(&self) -> bool {
        self.pending().is_empty()
    }

    /// 人类可读摘要
    pub fn summary(&self) -> String {
        let list = |joints: &[Joint]| {
            if joints.is_empty() {
                "none".to_string()
            } else {
                joints.iter().map(|j| j.index().to_string()).collect::<Vec<_>>().join(", ")
            }
        };
        if self.cancelled {
            format!(
                "auto initialisation cancelled; initialised joints: {}; pending joints: {}",
                list(&self.completed),
                list(&self.pending())
            )
        } else {
            format!("auto initialised joints: {}", list(&self.completed))
        }
    }
}

/// 自动初始化序列
///
/// 借用派发器持有的指令流、状态来源与取消令牌，单次运行后即丢弃。
pub struct AutoInitSequencer<'a, W, S, Z>
where
    W: Write,
    S: StatusSource + ?Sized,
    Z: Sleeper + ?Sized,
{
    config: &'a AutoInitConfig,
    status_policy: RetryPolicy,
    sink: &'a mut CommandSink<W>,
    source: &'a mut S,
    sleeper: &'a Z,
    cancel: &'a CancellationToken,
    status: StatusSnapshot,
    commands_sent: u32,
}

impl<'a, W, S, Z> AutoInitSequencer<'a, W, S, Z>
where
    W: Write,
    S: StatusSource + ?Sized,
    Z: Sleeper + ?Sized,
{
    /// 创建序列
    ///
    /// `initial` 是调用方持有的最新快照，用于前置条件检查和第一个关节的模式判断。
    pub fn new(
        config: &'a AutoInitConfig,
        status_policy: RetryPolicy,
        sink: &'a mut CommandSink<W>,
        source: &'a mut S,
        sleeper: &'a Z,
        cancel: &'a CancellationToken,
        initial: StatusSnapshot,
    ) -> Self {
        Self {
            config,
            status_policy,
            sink,
            source,
            sleeper,
            cancel,
            status: initial,
            commands_sent: 0,
        }
    }

    /// 运行过程中读到的最新快照
    pub fn status(&self) -> &StatusSnapshot {
        &self.status
    }

    /// 执行初始化序列
    ///
    /// # 错误
    ///
    /// - [`AutoInitError::NotInitializing`]: 前置条件不满足，未发出任何指令
    /// - [`AutoInitError::JointFailed`]: 某个关节未进入 running，后续关节不再尝试
    /// - [`AutoInitError::StatusUnavailable`]: 收敛轮询中状态读取超时
    /// - [`AutoInitError::Driver`]: 指令流写出失败或状态通道关闭
    ///
    /// 取消不是错误：返回 `cancelled = true` 的报告，且最后一条指令是停止指令。
    pub fn run(&mut self) -> Result<AutoInitReport, AutoInitError> {
        if self.status.robot_mode != RobotMode::Initializing {
            warn!(
                "auto init rejected: robot mode {} expected: {}",
                self.status.robot_mode,
                RobotMode::Initializing
            );
            return Err(AutoInitError::NotInitializing {
                mode: self.status.robot_mode,
            });
        }

        let mut completed = Vec::with_capacity(Joint::ALL.len());

        for joint in Joint::ALL.iter().rev().copied() {
            if self.cancel.is_cancelled() {
                break;
            }

            self.initialise_joint(joint)?;

            let mode = self.status.joint_mode(joint);
            if self.cancel.is_cancelled() {
                if mode == JointMode::Running {
                    info!("joint {} initialised", joint);
                    completed.push(joint);
                }
                break;
            }

            if mode != JointMode::Running {
                error!("failed to auto initialise joint {}, joint mode: {}", joint.index(), mode);
                return Err(AutoInitError::JointFailed { joint, mode });
            }

            info!("joint {} initialised", joint);
            completed.push(joint);
        }

        let cancelled = self.cancel.is_cancelled();
        if cancelled {
            warn!("auto initialisation cancelled, stopping joints");
            let stop = ControllerCommand::Raw(self.config.stop_command.clone());
            self.send(&stop)?;
        }

        Ok(AutoInitReport {
            completed,
            cancelled,
            commands_sent: self.commands_sent,
        })
    }

    /// 单关节内循环：关节保持 initializing 时重复发送初始化指令并等待收敛
    fn initialise_joint(&mut self, joint: Joint) -> Result<(), AutoInitError> {
        let mut attempts = 0;

        while !self.cancel.is_cancelled() {
            if self.status.joint_mode(joint) != JointMode::Initializing {
                break;
            }
            if attempts >= self.config.max_attempts_per_joint {
                warn!(
                    "joint {} still initializing after {} commands",
                    joint.index(),
                    attempts
                );
                break;
            }

            if attempts == 0 {
                info!("auto initialising joint {}", joint);
            }
            let line = self.config.joint_commands[joint.index()].clone();
            let command = ControllerCommand::Raw(line);
            self.send(&command)?;
            attempts += 1;

            if !self.wait_for_settle(joint)? {
                break;
            }
        }

        Ok(())
    }

    /// 等待关节速度收敛；返回 `false` 表示重试耗尽或被取消
    fn wait_for_settle(&mut self, joint: Joint) -> Result<bool, AutoInitError> {
        let interval = self.config.settle_interval();

        for retry in 0..self.config.settle_retries {
            if self.cancel.is_cancelled() {
                return Ok(false);
            }

            self.sleeper.sleep(interval);
            self.status = read_status(&mut *self.source, &self.status_policy, self.sleeper)?;

            let velocity = self.status.joint_velocity(joint);
            trace!(
                "joint {} settle poll {}: velocity {}, mode {}",
                joint.index(),
                retry + 1,
                velocity,
                self.status.joint_mode(joint)
            );
            if velocity.abs() <= self.config.velocity_threshold {
                return Ok(true);
            }
        }

        warn!(
            "joint {} did not settle after {} polls",
            joint.index(),
            self.config.settle_retries
        );
        Ok(false)
    }

    fn send(&mut self, command: &ControllerCommand) -> Result<(), AutoInitError> {
        self.sink.send(command).map_err(AutoInitError::Driver)?;
        self.commands_sent += 1;
        Ok(())
    }
}
