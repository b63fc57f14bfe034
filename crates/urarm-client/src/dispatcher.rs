//! # 指令派发器
//!
//! 每个 [`ArmCommand`] 变体对应一个处理方法，`dispatch` 对变体做穷举匹配。
//! 处理流程：
//!
//! 1. 刷新状态快照（非阻塞，排空到最新；无新数据时沿用上一个快照）
//! 2. 模式守卫（`is_running` / `is_initialising`）
//! 3. 安全包络校验
//! 4. 副作用：写一行控制器指令，或写一次运动基元（二者不会同时发生）
//!
//! 任何一步失败都不会产生副作用。
//!
//! ```rust,ignore
//! use urarm_client::{ArmCommand, CommandDispatcher, DispatcherConfig};
//!
//! let (publisher, source) = urarm_driver::status_channel(16);
//! let mut dispatcher = CommandDispatcher::new(
//!     Arc::new(DispatcherConfig::default()),
//!     stream,
//!     source,
//!     MotionPrimitiveSlot::new(),
//! );
//! let result = dispatcher.dispatch(&ArmCommand::Power { is_on: true })?;
//! ```

use crate::command::ArmCommand;
use crate::config::{DispatcherConfig, JogConfig};
use crate::error::{CommandError, DispatchResult};
use crate::guard::{is_initialising, is_running};
use crate::sequencer::{AutoInitReport, AutoInitSequencer};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use urarm_driver::{
    CancellationToken, CommandSink, DriverError, MotionPrimitiveSlot, Sleeper, SpinSleeper,
    StatusSource,
};
use urarm_protocol::{
    ControllerCommand, Deg, Joint, Meter, MotionPrimitiveInput, NamedPosition, RobotMode,
    StatusSnapshot,
};

/// 点动速度（rad/s）
///
/// 方向为正取基础速度，否则取负；关节 2 减半，关节 0 和 1 取三分之一。
pub fn jog_speed(jog: &JogConfig, joint: Joint, dir: bool) -> f64 {
    let speed = if dir { jog.base_speed } else { -jog.base_speed };
    match joint {
        Joint::Elbow => speed / 2.0,
        Joint::Base | Joint::Shoulder => speed / 3.0,
        Joint::Wrist1 | Joint::Wrist2 | Joint::Wrist3 => speed,
    }
}

/// 指令派发器
///
/// 单线程使用：同一时刻只有一条指令在处理。
pub struct CommandDispatcher<W: Write, S: StatusSource, Z: Sleeper = SpinSleeper> {
    config: Arc<DispatcherConfig>,
    sink: CommandSink<W>,
    primitive: MotionPrimitiveSlot,
    source: S,
    sleeper: Z,
    cancel: CancellationToken,
    status: Option<StatusSnapshot>,
}

impl<W: Write, S: StatusSource> CommandDispatcher<W, S, SpinSleeper> {
    /// 创建派发器（使用 `spin_sleep` 休眠）
    pub fn new(
        config: Arc<DispatcherConfig>,
        writer: W,
        source: S,
        primitive: MotionPrimitiveSlot,
    ) -> Self {
        Self {
            config,
            sink: CommandSink::new(writer),
            primitive,
            source,
            sleeper: SpinSleeper,
            cancel: CancellationToken::new(),
            status: None,
        }
    }
}

impl<W: Write, S: StatusSource, Z: Sleeper> CommandDispatcher<W, S, Z> {
    /// 替换休眠器（测试注入快速时钟）
    pub fn with_sleeper<Z2: Sleeper>(self, sleeper: Z2) -> CommandDispatcher<W, S, Z2> {
        CommandDispatcher {
            config: self.config,
            sink: self.sink,
            primitive: self.primitive,
            source: self.source,
            sleeper,
            cancel: self.cancel,
            status: self.status,
        }
    }

    /// 使用外部取消令牌（例如已挂接 Ctrl-C 的令牌）
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// 取消令牌（克隆共享同一标志）
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn sink(&self) -> &CommandSink<W> {
        &self.sink
    }

    pub fn primitive(&self) -> &MotionPrimitiveSlot {
        &self.primitive
    }

    /// 最近一次观察到的状态快照
    pub fn status(&self) -> Option<&StatusSnapshot> {
        self.status.as_ref()
    }

    pub fn into_sink(self) -> CommandSink<W> {
        self.sink
    }

    /// 派发一条指令
    ///
    /// 三类错误以 [`DispatchResult`] 数据返回；指令流写出失败、状态通道关闭等
    /// 协作层错误原样以 `Err` 返回。
    pub fn dispatch(&mut self, command: &ArmCommand) -> Result<DispatchResult, DriverError> {
        debug!("dispatching {}", command);

        let outcome = match command {
            ArmCommand::Power { is_on } => self.power(*is_on).map(|()| None),
            ArmCommand::Brakes { enable } => self.brakes(*enable).map(|()| None),
            ArmCommand::AutoInit => self
                .auto_init()
                .map(|report| report.cancelled.then(|| report.summary())),
            ArmCommand::MoveCam { pan, tilt, height } => {
                self.move_cam(*pan, *tilt, *height).map(|()| None)
            },
            ArmCommand::MoveJoints { angles } => self.move_joints(angles).map(|()| None),
            ArmCommand::JointMove { joint_id, dir } => {
                self.joint_move(*joint_id, *dir).map(|()| None)
            },
            ArmCommand::SetHome => self.set_home().map(|()| None),
            ArmCommand::SetPosition { name } => self.set_position(name).map(|()| None),
            ArmCommand::SetPositionGiraffe {
                position,
                pan,
                tilt,
            } => self.set_position_giraffe(position, *pan, *tilt).map(|()| None),
            ArmCommand::MoveEffector => self.move_effector().map(|()| None),
        };

        match outcome {
            Ok(None) => Ok(DispatchResult::success()),
            Ok(Some(message)) => Ok(DispatchResult::success_with(message)),
            Err(CommandError::Driver(e)) => {
                error!("{} failed: {}", command, e);
                Err(e)
            },
            Err(err) => {
                warn!("{} rejected: {}", command, err);
                DispatchResult::try_from(err)
            },
        }
    }

    /// 上电/断电（无模式前置条件）
    pub fn power(&mut self, is_on: bool) -> Result<(), CommandError> {
        info!("powering robot arm {}", if is_on { "on" } else { "off" });
        self.sink.send(&ControllerCommand::Power { on: is_on })?;
        Ok(())
    }

    /// 抱闸：`true` 立即停止所有关节，`false` 恢复运行模式
    pub fn brakes(&mut self, enable: bool) -> Result<(), CommandError> {
        if enable {
            info!("brakes on: stopping all joints");
            self.sink.send(&ControllerCommand::StopJoints)?;
        } else {
            info!("brakes off: resuming run mode");
            self.sink.send(&ControllerCommand::SetRobotModeRun)?;
        }
        Ok(())
    }

    /// 关节自动初始化
    ///
    /// 取消不是错误，返回的报告中 `cancelled == true`。
    pub fn auto_init(&mut self) -> Result<AutoInitReport, CommandError> {
        let status = self.refresh_status()?;
        info!("running auto init");

        let mut sequencer = AutoInitSequencer::new(
            &self.config.auto_init,
            self.config.status_read.policy(),
            &mut self.sink,
            &mut self.source,
            &self.sleeper,
            &self.cancel,
            status,
        );
        let result = sequencer.run();
        let last = *sequencer.status();
        self.status = Some(last);

        let report = result?;
        if !report.cancelled {
            info!("auto init completed");
        }
        Ok(report)
    }

    /// 相机位姿
    pub fn move_cam(&mut self, pan: Deg, tilt: Deg, height: Meter) -> Result<(), CommandError> {
        let status = self.refresh_status()?;
        if !is_running(&status) {
            return Err(not_running("move (camera)"));
        }

        let envelope = &self.config.envelope;
        envelope.check_pan(pan)?;
        envelope.check_tilt(tilt)?;
        envelope.check_height(height)?;

        info!("move cam: pan {}, tilt {}, height {}", pan, tilt, height);
        self.write_camera(pan, tilt, height);
        Ok(())
    }

    /// 六关节目标角度
    pub fn move_joints(&mut self, angles: &[Deg; 6]) -> Result<(), CommandError> {
        let status = self.refresh_status()?;
        if !is_running(&status) {
            return Err(not_running("move (joints)"));
        }

        self.config.envelope.check_joint_angles(angles)?;

        info!("move joints: {:?}", angles.map(Deg::value));
        self.primitive.write(MotionPrimitiveInput::move_joints(angles.map(Deg::value)));
        Ok(())
    }

    /// 初始化模式下单关节点动
    pub fn joint_move(&mut self, joint_id: u8, dir: bool) -> Result<(), CommandError> {
        let status = self.refresh_status()?;
        if !is_initialising(&status) {
            let joint_mode = Joint::from_index(usize::from(joint_id))
                .map_or("invalid joint", |joint| status.joint_mode(joint).as_str());
            return Err(CommandError::InvalidRobotState(format!(
                "cannot move joint {} as arm is not initializing: robot mode '{}', joint mode '{}'",
                joint_id,
                status.robot_mode.as_str(),
                joint_mode
            )));
        }

        let joint = self.config.envelope.check_joint_id(joint_id)?;

        info!("move joint {} dir {}", joint.index(), dir);
        let jog = &self.config.jog;
        let command = ControllerCommand::speed_init_single(
            joint.index(),
            jog_speed(jog, joint, dir),
            jog.acceleration,
            jog.duration_secs(),
        );
        self.sink.send(&command)?;
        Ok(())
    }

    /// 设置 home（无前置条件，无数值负载）
    pub fn set_home(&mut self) -> Result<(), CommandError> {
        info!("set home");
        self.primitive.write(MotionPrimitiveInput::set_home());
        Ok(())
    }

    /// 预设位置
    pub fn set_position(&mut self, name: &str) -> Result<(), CommandError> {
        let status = self.refresh_status()?;
        if !is_running(&status) {
            return Err(not_running("set position"));
        }

        let position = NamedPosition::from_name(name).ok_or_else(|| {
            CommandError::InvalidInput(format!(
                "unknown position type '{}': expected '{}' or '{}'",
                name,
                NamedPosition::Giraffe.as_str(),
                NamedPosition::Home.as_str()
            ))
        })?;

        info!("set position {}", position.as_str());
        self.primitive.write(MotionPrimitiveInput::set_position(position));
        Ok(())
    }

    /// 带 pan/tilt 的长颈鹿位
    pub fn set_position_giraffe(
        &mut self,
        position: &str,
        pan: Deg,
        tilt: Deg,
    ) -> Result<(), CommandError> {
        let status = self.refresh_status()?;
        if !is_running(&status) {
            return Err(not_running("set giraffe position"));
        }

        if NamedPosition::from_name(position) != Some(NamedPosition::Giraffe) {
            return Err(CommandError::InvalidInput(format!(
                "unknown position type '{}': expected 'giraffe' when specifying pan and tilt angles",
                position
            )));
        }

        let envelope = &self.config.envelope;
        envelope.check_pan(pan)?;
        envelope.check_tilt(tilt)?;

        info!("giraffe position: pan {}, tilt {}", pan, tilt);
        let height = Meter(self.config.camera.giraffe_height);
        self.write_camera(pan, tilt, height);
        Ok(())
    }

    /// 末端执行器：接受但不执行
    pub fn move_effector(&mut self) -> Result<(), CommandError> {
        debug!("move effector ignored");
        Ok(())
    }

    fn write_camera(&self, pan: Deg, tilt: Deg, height: Meter) {
        let tilt = Deg(self.config.camera.zero_tilt) - tilt;
        self.primitive
            .write(MotionPrimitiveInput::move_cam(pan.value(), tilt.value(), height.value()));
    }

    /// 排空状态来源；没有新数据时沿用上一个快照，从未收到过时为全 Unknown
    fn refresh_status(&mut self) -> Result<StatusSnapshot, DriverError> {
        if let Some(status) = self.source.try_next()? {
            self.status = Some(status);
        }
        let status = self.status.unwrap_or_default();
        if status.robot_mode == RobotMode::Unknown {
            debug!("no robot mode known yet");
        }
        Ok(status)
    }
}

fn not_running(action: &str) -> CommandError {
    CommandError::InvalidRobotState(format!("cannot {} as arm is not in running mode", action))
}
