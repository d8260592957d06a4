//! Формы хост-значений, которые понимает слой конвертации.

use std::fmt;

use crate::{
    array::{Array, Element},
    scalar::ScalarCodec,
};

/// Хост-значение на входе в [`Array::from_host`].
///
/// `Natives(None)` и `Elements(None)` — типизированный nil, дают NULL массив
/// так же, как `Nil`.
pub enum HostValue<S: ScalarCodec> {
    Nil,
    /// Последовательность в естественном хост-типе кодека.
    Natives(Option<Vec<S::Native>>),
    /// Уже канонические элементы.
    Elements(Option<Vec<Element<S::Value>>>),
    /// Готовый массив.
    Array(Array<S>),
    /// Обёртка, которая может отдать вложенное значение.
    Wrapped(Box<dyn HostWrapper<S>>),
    /// Тип, структурно сводимый к одной из прямых форм.
    Sequence(Box<dyn AsSequence<S>>),
}

/// Значение, которое умеет отдать своё содержимое как другое хост-значение.
pub trait HostWrapper<S: ScalarCodec> {
    /// `None` — обёртке нечего отдать.
    fn inner(&self) -> Option<HostValue<S>>;

    fn type_name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Именованная последовательность, чьё представление совпадает с одной из
/// прямых форм (`Natives`, `Elements`, `Array`).
pub trait AsSequence<S: ScalarCodec> {
    fn underlying(&self) -> Option<HostValue<S>>;

    fn type_name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Любой тип, который выглядит как срез хост-значений кодека.
impl<S, T> AsSequence<S> for T
where
    S: ScalarCodec,
    T: AsRef<[S::Native]>,
{
    fn underlying(&self) -> Option<HostValue<S>> {
        Some(HostValue::Natives(Some(self.as_ref().to_vec())))
    }
}

/// Цель для [`Array::assign_to`].
pub enum HostTarget<'a, S: ScalarCodec> {
    /// Не допускает NULL элементов. NULL массив даёт `None`.
    Natives(&'a mut Option<Vec<S::Native>>),
    /// NULL элементы становятся `None`.
    OptionalNatives(&'a mut Option<Vec<Option<S::Native>>>),
    /// Пользовательская цель, которая может предложить другую форму.
    Custom(&'a mut dyn AssignTarget<S>),
}

/// Пользовательская цель присваивания.
pub trait AssignTarget<S: ScalarCodec> {
    /// Другая форма цели, в которую можно записать массив. `None` — цель не
    /// принимает массивы этого типа.
    fn alternate(&mut self) -> Option<HostTarget<'_, S>>;

    fn type_name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<S: ScalarCodec> HostValue<S> {
    pub fn natives(values: Vec<S::Native>) -> Self {
        Self::Natives(Some(values))
    }

    pub fn elements(elements: Vec<Element<S::Value>>) -> Self {
        Self::Elements(Some(elements))
    }

    pub fn wrapped(wrapper: impl HostWrapper<S> + 'static) -> Self {
        Self::Wrapped(Box::new(wrapper))
    }

    pub fn sequence(seq: impl AsSequence<S> + 'static) -> Self {
        Self::Sequence(Box::new(seq))
    }

    /// Имя формы для сообщений об ошибках.
    pub fn type_name(&self) -> String {
        match self {
            Self::Nil => "nil".to_string(),
            Self::Natives(_) => format!("Vec<{}>", std::any::type_name::<S::Native>()),
            Self::Elements(_) => format!("Vec<Element<{}>>", std::any::type_name::<S::Value>()),
            Self::Array(_) => format!("{}[]", S::TYPE_NAME),
            Self::Wrapped(w) => w.type_name(),
            Self::Sequence(s) => s.type_name(),
        }
    }

    /// Прямые формы конвертируются без разворачивания.
    pub fn is_direct(&self) -> bool {
        matches!(
            self,
            Self::Nil | Self::Natives(_) | Self::Elements(_) | Self::Array(_)
        )
    }
}

impl<S: ScalarCodec> From<Vec<S::Native>> for HostValue<S> {
    fn from(values: Vec<S::Native>) -> Self {
        Self::natives(values)
    }
}

impl<S: ScalarCodec> From<Array<S>> for HostValue<S> {
    fn from(array: Array<S>) -> Self {
        Self::Array(array)
    }
}

impl<S: ScalarCodec> fmt::Debug for HostValue<S> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "Nil"),
            Self::Natives(v) => f.debug_tuple("Natives").field(v).finish(),
            Self::Elements(v) => f.debug_tuple("Elements").field(v).finish(),
            Self::Array(a) => f.debug_tuple("Array").field(a).finish(),
            Self::Wrapped(w) => write!(f, "Wrapped({})", w.type_name()),
            Self::Sequence(s) => write!(f, "Sequence({})", s.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Int4;

    struct Ids(Vec<i32>);

    impl AsRef<[i32]> for Ids {
        fn as_ref(&self) -> &[i32] {
            &self.0
        }
    }

    #[test]
    fn test_blanket_sequence() {
        let seq: &dyn AsSequence<Int4> = &Ids(vec![1, 2]);
        match seq.underlying() {
            Some(HostValue::Natives(Some(v))) => assert_eq!(v, vec![1, 2]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(seq.type_name().ends_with("Ids"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(HostValue::<Int4>::Nil.type_name(), "nil");
        assert_eq!(HostValue::<Int4>::natives(vec![]).type_name(), "Vec<i32>");
        assert_eq!(HostValue::<Int4>::from(Array::empty()).type_name(), "int4[]");
        assert!(HostValue::<Int4>::natives(vec![]).is_direct());
        assert!(!HostValue::<Int4>::sequence(Ids(vec![])).is_direct());
    }
}
