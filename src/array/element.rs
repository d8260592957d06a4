use serde::{ser, Deserialize, Serialize, Serializer};

/// Состояние значения: массива целиком или отдельного элемента.
///
/// `Undefined` — значение не было ни сконструировано, ни декодировано;
/// такое значение никогда не уходит на wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Undefined,
    Null,
    Present,
}

/// Один элемент массива в одном из трёх состояний.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<T> {
    Present(T),
    Null,
    Undefined,
}

impl<T> Element<T> {
    pub fn status(&self) -> Status {
        match self {
            Self::Present(_) => Status::Present,
            Self::Null => Status::Null,
            Self::Undefined => Status::Undefined,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Ссылка на полезную нагрузку, если элемент `Present`.
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_present(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> Default for Element<T> {
    fn default() -> Self {
        Self::Undefined
    }
}

impl<T> From<Option<T>> for Element<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Null,
        }
    }
}

/// `Present` сериализуется как значение, `Null` как `null`. `Undefined`
/// сериализовать нельзя.
impl<T: Serialize> Serialize for Element<T> {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Present(v) => v.serialize(serializer),
            Self::Null => serializer.serialize_none(),
            Self::Undefined => Err(ser::Error::custom("cannot serialize undefined element")),
        }
    }
}
