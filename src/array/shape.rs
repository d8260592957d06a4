//! Модель формы массива: размерности и арифметика плоских индексов.
//!
//! Элементы хранятся в row-major порядке: последняя размерность меняется
//! быстрее всех. Нижняя граница влияет только на подписи индексов в
//! текстовой форме и никогда не меняет порядок элементов.

use serde::{Deserialize, Serialize};

use super::DEFAULT_LOWER_BOUND;

/// Одна ось массива: длина и начальный индекс.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub length: u32,
    pub lower_bound: i32,
}

impl Dimension {
    pub fn new(
        length: u32,
        lower_bound: i32,
    ) -> Self {
        Self {
            length,
            lower_bound,
        }
    }

    /// Размерность с нижней границей по умолчанию (1).
    pub fn with_length(length: u32) -> Self {
        Self::new(length, DEFAULT_LOWER_BOUND)
    }

    /// Верхняя граница включительно. Для пустой оси равна `lower_bound - 1`.
    pub fn upper_bound(&self) -> i64 {
        self.lower_bound as i64 + self.length as i64 - 1
    }

    /// Верхняя граница непустой оси помещается в `i32`.
    pub fn has_valid_upper_bound(&self) -> bool {
        self.length == 0 || self.upper_bound() <= i32::MAX as i64
    }

    pub fn has_default_lower_bound(&self) -> bool {
        self.lower_bound == DEFAULT_LOWER_BOUND
    }
}

/// Кол-во элементов в плоской последовательности: произведение длин, 0 для
/// пустого списка размерностей.
///
/// Возвращает `None` при переполнении `usize`.
pub fn element_count(dims: &[Dimension]) -> Option<usize> {
    if dims.is_empty() {
        return Some(0);
    }
    dims.iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(d.length as usize))
}

/// Суффиксные произведения длин по возрастанию: сначала длина самой
/// внутренней оси, последним — полное кол-во элементов.
///
/// На позиции `i` перед элементом открывается по одной группе на каждую
/// границу `b`, для которой `i % b == 0`, и после элемента закрывается по
/// одной на каждую `b`, для которой `(i + 1) % b == 0`.
pub fn boundaries(dims: &[Dimension]) -> Vec<usize> {
    let mut out = Vec::with_capacity(dims.len());
    let mut acc = 1usize;
    for d in dims.iter().rev() {
        acc = acc.saturating_mul(d.length as usize);
        out.push(acc);
    }
    out
}

/// Сколько групп открывается перед элементом `index`.
pub fn opening_count(
    bounds: &[usize],
    index: usize,
) -> usize {
    bounds.iter().filter(|&&b| b > 0 && index % b == 0).count()
}

/// Сколько групп закрывается после элемента `index`.
pub fn closing_count(
    bounds: &[usize],
    index: usize,
) -> usize {
    bounds
        .iter()
        .filter(|&&b| b > 0 && (index + 1) % b == 0)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(lengths: &[u32]) -> Vec<Dimension> {
        lengths.iter().map(|&l| Dimension::with_length(l)).collect()
    }

    #[test]
    fn test_element_count() {
        assert_eq!(element_count(&[]), Some(0));
        assert_eq!(element_count(&dims(&[3])), Some(3));
        assert_eq!(element_count(&dims(&[2, 3, 4])), Some(24));
        assert_eq!(element_count(&dims(&[2, 0, 4])), Some(0));
    }

    #[test]
    fn test_element_count_overflow() {
        let huge = dims(&[u32::MAX, u32::MAX, u32::MAX]);
        assert_eq!(element_count(&huge), None);
    }

    #[test]
    fn test_boundaries_ascending() {
        assert_eq!(boundaries(&dims(&[2, 3])), vec![3, 6]);
        assert_eq!(boundaries(&dims(&[2, 3, 4])), vec![4, 12, 24]);
        assert!(boundaries(&[]).is_empty());
    }

    /// Тест проверяет расстановку скобок для 2x3: `{{1,2,3},{4,5,6}}`.
    #[test]
    fn test_open_close_counts_2x3() {
        let b = boundaries(&dims(&[2, 3]));
        let opens: Vec<usize> = (0..6).map(|i| opening_count(&b, i)).collect();
        let closes: Vec<usize> = (0..6).map(|i| closing_count(&b, i)).collect();
        assert_eq!(opens, vec![2, 0, 0, 1, 0, 0]);
        assert_eq!(closes, vec![0, 0, 1, 0, 0, 2]);
    }

    /// Тест проверяет баланс скобок на любой форме.
    #[test]
    fn test_balanced_nesting() {
        for shape in [&[1u32][..], &[4], &[2, 2], &[3, 1, 2], &[1, 1, 1, 1]] {
            let d = dims(shape);
            let b = boundaries(&d);
            let n = element_count(&d).unwrap();
            let opened: usize = (0..n).map(|i| opening_count(&b, i)).sum();
            let closed: usize = (0..n).map(|i| closing_count(&b, i)).sum();
            assert_eq!(opened, closed, "shape {shape:?}");
            assert_eq!(opening_count(&b, 0), shape.len());
            assert_eq!(closing_count(&b, n - 1), shape.len());
        }
    }

    #[test]
    fn test_upper_bound() {
        assert_eq!(Dimension::new(2, 4).upper_bound(), 5);
        assert_eq!(Dimension::new(0, 1).upper_bound(), 0);
        assert_eq!(Dimension::new(1, i32::MAX).upper_bound(), i32::MAX as i64);
        assert!(Dimension::with_length(3).has_default_lower_bound());
    }

    #[test]
    fn test_valid_upper_bound() {
        assert!(Dimension::new(1, i32::MAX).has_valid_upper_bound());
        assert!(!Dimension::new(2, i32::MAX).has_valid_upper_bound());
        assert!(Dimension::new(0, i32::MAX).has_valid_upper_bound());
        assert!(Dimension::new(u32::MAX, i32::MIN).has_valid_upper_bound());
    }
}
