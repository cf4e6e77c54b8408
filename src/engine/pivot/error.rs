// ==========================================
// 畜牧饲料成本核算引擎 - 透视引擎错误类型
// ==========================================
// 红线: 仅配置非法才报错 (编程错误),数据问题一律降级
// ==========================================

use thiserror::Error;

/// 透视配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PivotError {
    #[error("透视配置无效: values 不能为空")]
    NoValues,

    #[error("未知的透视维度: {0}")]
    UnknownDimension(String),

    #[error("未知的数值字段: {0}")]
    UnknownValueField(String),

    #[error("未知的聚合方式: {0}")]
    UnknownAggregation(String),

    #[error("透视维度重复: {0}")]
    DuplicateDimension(String),

    #[error("透视配置解析失败: {0}")]
    InvalidConfig(String),
}

/// Result 类型别名
pub type PivotResult<T> = Result<T, PivotError>;
