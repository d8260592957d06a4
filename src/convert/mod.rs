//! Слой конвертации между хост-значениями и каноническим [`Array`].
//!
//! Формы хост-значений — закрытый enum ([`HostValue`], [`HostTarget`]).
//! Открытость обеспечивают трейты [`HostWrapper`], [`AsSequence`] и
//! [`AssignTarget`]: движок пробует их по очереди, не зная конкретных типов.
//!
//! [`Array`]: crate::array::Array

pub mod assign;
pub mod dispatch;
pub mod host;

pub use host::{AsSequence, AssignTarget, HostTarget, HostValue, HostWrapper};
