//! 错误类型与派发结果
//!
//! 三类可恢复错误以数据形式返回给调用方：
//!
//! - **InvalidInput**: 参数越界或格式错误，调用方可修正后重新提交
//! - **InvalidRobotState**: 模式前置条件不满足，调用方应等待或先切换状态
//! - **Failure**: 运行期失败（关节初始化未完成、状态读取超时），需要检查机械臂
//!
//! 其余错误（指令流 IO 错误、状态通道关闭）不属于上述三类，
//! 原样作为 [`DriverError`] 传递给协作层。

use std::fmt;
use thiserror::Error;
use urarm_driver::DriverError;

/// 错误种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    InvalidRobotState,
    Failure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::InvalidRobotState => "invalid robot state",
            ErrorKind::Failure => "failure",
        };
        f.write_str(name)
    }
}

/// 指令处理错误
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidRobotState(String),

    #[error("{0}")]
    Failure(String),

    /// 协作层错误，不归入三类错误种类
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl CommandError {
    /// 错误种类；协作层错误返回 `None`
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CommandError::InvalidInput(_) => Some(ErrorKind::InvalidInput),
            CommandError::InvalidRobotState(_) => Some(ErrorKind::InvalidRobotState),
            CommandError::Failure(_) => Some(ErrorKind::Failure),
            CommandError::Driver(_) => None,
        }
    }
}

/// 派发结果
///
/// 值类型，生成后即为终态。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DispatchResult {
    pub ok: bool,
    pub message: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl DispatchResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            message: None,
            error_kind: None,
        }
    }

    /// 带说明信息的成功结果（如初始化被取消）
    pub fn success_with(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            error_kind: None,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            error_kind: Some(kind),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl TryFrom<CommandError> for DispatchResult {
    type Error = DriverError;

    /// 三类错误转为失败结果；协作层错误原样返回
    fn try_from(err: CommandError) -> Result<Self, Self::Error> {
        match err {
            CommandError::InvalidInput(msg) => Ok(Self::failure(ErrorKind::InvalidInput, msg)),
            CommandError::InvalidRobotState(msg) => {
                Ok(Self::failure(ErrorKind::InvalidRobotState, msg))
            },
            CommandError::Failure(msg) => Ok(Self::failure(ErrorKind::Failure, msg)),
            CommandError::Driver(e) => Err(e),
        }
    }
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ok, &self.error_kind, &self.message) {
            (true, _, None) => f.write_str("ok"),
            (true, _, Some(msg)) => write!(f, "ok: {}", msg),
            (false, Some(kind), Some(msg)) => write!(f, "error ({}): {}", kind, msg),
            (false, Some(kind), None) => write!(f, "error ({})", kind),
            (false, None, msg) => write!(f, "error: {}", msg.as_deref().unwrap_or("unknown")),
        }
    }
}
