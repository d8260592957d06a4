//! Каноническое представление N-мерного массива.
//!
//! [`Array`] — это форма (список [`Dimension`]), плоская последовательность
//! элементов в row-major порядке и статус всего значения. Значение
//! конструируется один раз (кодеком или слоем конвертации) и дальше не
//! меняется.

pub mod element;
pub mod shape;

pub use element::{Element, Status};
pub use shape::{boundaries, closing_count, element_count, opening_count, Dimension};

use pgarray_error::{ensure, ArrayError, ArrayResult};
use serde::{ser, Serialize, Serializer};

use crate::scalar::ScalarCodec;

/// Нижняя граница, которую получает размерность без явной аннотации.
pub const DEFAULT_LOWER_BOUND: i32 = 1;

/// N-мерный массив элементов скалярного типа `S`.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<S: ScalarCodec> {
    pub elements: Vec<Element<S::Value>>,
    pub dimensions: Vec<Dimension>,
    pub status: Status,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<S: ScalarCodec> Array<S> {
    /// SQL NULL массив.
    pub fn null() -> Self {
        Self {
            elements: Vec::new(),
            dimensions: Vec::new(),
            status: Status::Null,
        }
    }

    /// Пустой, но присутствующий массив (`{}`): ноль размерностей.
    pub fn empty() -> Self {
        Self {
            elements: Vec::new(),
            dimensions: Vec::new(),
            status: Status::Present,
        }
    }

    /// Одномерный массив с нижней границей 1. Пустой вход даёт
    /// [`Array::empty`].
    ///
    /// Длина больше `u32::MAX` насыщается, и такой массив не проходит
    /// [`Array::validate_shape`]. Проверяемый вариант: [`Array::try_from_elements`].
    pub fn from_elements(elements: Vec<Element<S::Value>>) -> Self {
        if elements.is_empty() {
            return Self::empty();
        }
        let length = u32::try_from(elements.len()).unwrap_or(u32::MAX);
        Self {
            elements,
            dimensions: vec![Dimension::with_length(length)],
            status: Status::Present,
        }
    }

    /// Как [`Array::from_elements`], но длина, не помещающаяся в размерность,
    /// даёт `SizeLimit`.
    pub fn try_from_elements(elements: Vec<Element<S::Value>>) -> ArrayResult<Self> {
        if elements.is_empty() {
            return Ok(Self::empty());
        }
        let dimension = single_dimension(elements.len())?;
        Ok(Self {
            elements,
            dimensions: vec![dimension],
            status: Status::Present,
        })
    }

    /// Одномерный массив из готовых значений, без NULL.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = S::Value>,
    {
        Self::from_elements(values.into_iter().map(Element::Present).collect())
    }

    /// Массив произвольной формы. Кол-во элементов проверяется по
    /// размерностям.
    pub fn new(
        elements: Vec<Element<S::Value>>,
        dimensions: Vec<Dimension>,
    ) -> ArrayResult<Self> {
        let array = Self {
            elements,
            dimensions,
            status: Status::Present,
        };
        array.validate_shape()?;
        Ok(array)
    }

    pub fn is_null(&self) -> bool {
        self.status == Status::Null
    }

    pub fn is_present(&self) -> bool {
        self.status == Status::Present
    }

    pub fn ndims(&self) -> usize {
        self.dimensions.len()
    }

    /// Кол-во элементов, которое описывают размерности.
    pub fn expected_len(&self) -> ArrayResult<usize> {
        element_count(&self.dimensions).ok_or_else(|| {
            ArrayError::SizeLimit {
                what: "element count".to_string(),
                size: usize::MAX,
                limit: usize::MAX,
            }
            .into()
        })
    }

    /// Проверяет, что кол-во элементов совпадает с произведением длин, а
    /// верхняя граница каждой непустой оси помещается в `i32`.
    ///
    /// NULL и Undefined массивы форму не имеют и проходят проверку.
    pub fn validate_shape(&self) -> ArrayResult<()> {
        if self.status != Status::Present {
            return Ok(());
        }
        for (i, d) in self.dimensions.iter().enumerate() {
            ensure!(
                d.has_valid_upper_bound(),
                ArrayError::SizeLimit {
                    what: format!("upper bound of dimension {i}"),
                    size: d.upper_bound() as usize,
                    limit: i32::MAX as usize,
                }
            );
        }
        let expected = self.expected_len()?;
        ensure!(
            expected == self.elements.len(),
            ArrayError::ShapeMismatch {
                expected,
                got: self.elements.len(),
            }
        );
        Ok(())
    }

    /// Есть ли хотя бы один NULL элемент.
    pub fn contains_null(&self) -> bool {
        self.elements.iter().any(Element::is_null)
    }

    /// Есть ли размерность с нижней границей, отличной от 1.
    pub fn has_custom_bounds(&self) -> bool {
        self.dimensions
            .iter()
            .any(|d| !d.has_default_lower_bound())
    }
}

/// Одна ось с нижней границей 1 под `len` элементов.
pub(crate) fn single_dimension(len: usize) -> ArrayResult<Dimension> {
    let length = u32::try_from(len).map_err(|_| ArrayError::SizeLimit {
        what: "array length".to_string(),
        size: len,
        limit: u32::MAX as usize,
    })?;
    Ok(Dimension::with_length(length))
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для Array
////////////////////////////////////////////////////////////////////////////////

/// JSON-представление: NULL массив как `null`, иначе плоский список элементов
/// в row-major порядке (`null` на месте NULL элемента). Форма и границы не
/// сохраняются.
impl<S> Serialize for Array<S>
where
    S: ScalarCodec,
    S::Value: Serialize,
{
    fn serialize<Ser>(
        &self,
        serializer: Ser,
    ) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        match self.status {
            Status::Null => serializer.serialize_none(),
            Status::Undefined => Err(ser::Error::custom(format!(
                "cannot serialize undefined {}[]",
                S::TYPE_NAME
            ))),
            Status::Present => {
                self.validate_shape().map_err(ser::Error::custom)?;
                serializer.collect_seq(&self.elements)
            }
        }
    }
}

impl<S: ScalarCodec> Default for Array<S> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            dimensions: Vec::new(),
            status: Status::Undefined,
        }
    }
}
