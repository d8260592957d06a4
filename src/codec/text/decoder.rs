//! Разбор текстовой формы массива:
//! `[lo:hi]...={...}` с вложенными группами в фигурных скобках.
//!
//! Разбор идёт в два шага. Сначала [`TextParser`] строит нетипизированный
//! [`RawTextArray`] (байты элементов и форма), затем каждый элемент
//! передаётся текстовому декодеру скалярного кодека.

use std::borrow::Cow;

use memchr::memchr2;
use pgarray_error::{ArrayError, ArrayResult, WireFormat};
use tracing::debug;

use super::is_array_space;
use crate::{
    array::{Array, Dimension, Element, Status, DEFAULT_LOWER_BOUND},
    config::CodecSettings,
    context::CodecContext,
    scalar::ScalarCodec,
};

/// Результат синтаксического разбора без интерпретации элементов.
///
/// `None` — NULL элемент.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTextArray<'a> {
    pub elements: Vec<Option<Cow<'a, [u8]>>>,
    pub dimensions: Vec<Dimension>,
}

/// Декодирует текстовую форму. `None` на входе — NULL массив.
pub fn decode<S: ScalarCodec>(
    ctx: &CodecContext,
    src: Option<&[u8]>,
) -> ArrayResult<Array<S>> {
    let Some(src) = src else {
        return Ok(Array::null());
    };

    let raw = parse(src, &ctx.settings)?;

    let mut elements = Vec::with_capacity(raw.elements.len());
    for (i, item) in raw.elements.iter().enumerate() {
        let elem: Element<S::Value> =
            S::decode_text(item.as_deref()).map_err(|e| ArrayError::element(i, e))?;
        elements.push(elem);
    }

    debug!(
        type_name = S::TYPE_NAME,
        ndims = raw.dimensions.len(),
        elements = elements.len(),
        bytes = src.len(),
        "decoded text array"
    );

    Ok(Array {
        elements,
        dimensions: raw.dimensions,
        status: Status::Present,
    })
}

/// Синтаксический разбор текстовой формы.
pub fn parse<'a>(
    src: &'a [u8],
    settings: &CodecSettings,
) -> ArrayResult<RawTextArray<'a>> {
    TextParser::new(src, settings).parse()
}

/// Что лежит внутри одной группы `{...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Empty,
    Groups,
    Elements,
}

struct TextParser<'a> {
    input: &'a [u8],
    pos: usize,
    max_dimensions: usize,
    max_elements: usize,
    /// Длина групп на каждом уровне вложенности (индекс = глубина - 1).
    lengths: Vec<u32>,
    /// Глубина, на которой лежат элементы.
    leaf_depth: Option<usize>,
    elements: Vec<Option<Cow<'a, [u8]>>>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<'a> TextParser<'a> {
    fn new(
        input: &'a [u8],
        settings: &CodecSettings,
    ) -> Self {
        Self {
            input,
            pos: 0,
            max_dimensions: settings.max_dimensions,
            max_elements: settings.max_elements,
            lengths: Vec::new(),
            leaf_depth: None,
            elements: Vec::new(),
        }
    }

    fn parse(mut self) -> ArrayResult<RawTextArray<'a>> {
        self.skip_whitespace();
        let bounds = if self.peek() == Some(b'[') {
            let b = self.parse_bounds()?;
            self.skip_whitespace();
            self.expect(b'=')?;
            self.skip_whitespace();
            Some(b)
        } else {
            None
        };

        self.expect(b'{')?;
        let kind = self.parse_group(1)?;

        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.malformed("unexpected data after closing brace"));
        }

        if kind == GroupKind::Empty {
            if let Some(b) = bounds {
                if !b.is_empty() {
                    return Err(self.malformed("dimension bounds given for an empty array"));
                }
            }
            return Ok(RawTextArray {
                elements: Vec::new(),
                dimensions: Vec::new(),
            });
        }

        let dimensions = self.build_dimensions(bounds)?;
        Ok(RawTextArray {
            elements: self.elements,
            dimensions,
        })
    }

    /// `[lo:hi][lo:hi]...` до знака `=`.
    fn parse_bounds(&mut self) -> ArrayResult<Vec<(i32, i32)>> {
        let mut bounds = Vec::new();
        while self.peek() == Some(b'[') {
            if bounds.len() == self.max_dimensions {
                return Err(self.malformed(format!(
                    "number of dimensions exceeds the maximum allowed ({})",
                    self.max_dimensions
                )));
            }
            self.pos += 1;
            let lo = self.parse_bound_int()?;
            self.expect(b':')?;
            let hi = self.parse_bound_int()?;
            self.expect(b']')?;
            if (hi as i64) < lo as i64 - 1 {
                return Err(self.malformed(format!(
                    "upper bound {hi} cannot be less than lower bound {lo} minus one"
                )));
            }
            bounds.push((lo, hi));
            self.skip_whitespace();
        }
        Ok(bounds)
    }

    fn parse_bound_int(&mut self) -> ArrayResult<i32> {
        self.skip_whitespace();
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let digits = &self.input[start..self.pos];
        let value = std::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse::<i32>().ok())
            .ok_or_else(|| self.malformed_at("invalid dimension bound", start))?;
        self.skip_whitespace();
        Ok(value)
    }

    /// Разбирает группу после открывающей `{`, включая закрывающую `}`.
    fn parse_group(
        &mut self,
        depth: usize,
    ) -> ArrayResult<GroupKind> {
        if depth > self.max_dimensions {
            return Err(self.malformed(format!(
                "number of array dimensions exceeds the maximum allowed ({})",
                self.max_dimensions
            )));
        }

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            if depth > 1 {
                return Err(self.malformed("empty sub-array"));
            }
            return Ok(GroupKind::Empty);
        }

        let mut kind = GroupKind::Empty;
        let mut count: u32 = 0;
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'{') {
                if kind == GroupKind::Elements {
                    return Err(self.malformed("sub-array mixed with scalar elements"));
                }
                kind = GroupKind::Groups;
                self.pos += 1;
                self.parse_group(depth + 1)?;
            } else {
                if kind == GroupKind::Groups {
                    return Err(self.malformed("scalar element mixed with sub-arrays"));
                }
                kind = GroupKind::Elements;
                match self.leaf_depth {
                    Some(d) if d != depth => {
                        return Err(self.malformed(
                            "multidimensional arrays must have sub-arrays with matching dimensions",
                        ));
                    }
                    _ => self.leaf_depth = Some(depth),
                }
                if self.elements.len() >= self.max_elements {
                    return Err(self.malformed(format!(
                        "array size exceeds the maximum allowed ({})",
                        self.max_elements
                    )));
                }
                let elem = self.parse_element()?;
                self.elements.push(elem);
            }
            count = count
                .checked_add(1)
                .ok_or_else(|| self.malformed("dimension length overflow"))?;

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.malformed("expected ',' or '}'")),
                None => return Err(self.malformed("unexpected end of input")),
            }
        }

        self.record_length(depth, count)?;
        Ok(kind)
    }

    /// Все группы одного уровня должны иметь одинаковую длину.
    fn record_length(
        &mut self,
        depth: usize,
        count: u32,
    ) -> ArrayResult<()> {
        let idx = depth - 1;
        if idx >= self.lengths.len() {
            self.lengths.resize(depth, 0);
            self.lengths[idx] = count;
            return Ok(());
        }
        if self.lengths[idx] == 0 {
            self.lengths[idx] = count;
        } else if self.lengths[idx] != count {
            return Err(self.malformed(format!(
                "multidimensional arrays must have sub-arrays with matching dimensions: \
                 expected {} elements at depth {depth}, got {count}",
                self.lengths[idx]
            )));
        }
        Ok(())
    }

    fn parse_element(&mut self) -> ArrayResult<Option<Cow<'a, [u8]>>> {
        match self.peek() {
            Some(b'"') => {
                self.pos += 1;
                self.parse_quoted().map(Some)
            }
            Some(_) => self.parse_unquoted(),
            None => Err(self.malformed("unexpected end of input")),
        }
    }

    /// Элемент в кавычках. `\x` даёт `x` для любого байта.
    fn parse_quoted(&mut self) -> ArrayResult<Cow<'a, [u8]>> {
        let input = self.input;
        let start = self.pos;
        let mut owned: Option<Vec<u8>> = None;
        let mut chunk_start = self.pos;

        loop {
            let rest = &input[self.pos..];
            let Some(off) = memchr2(b'"', b'\\', rest) else {
                return Err(self.malformed_at("unterminated quoted element", start));
            };
            let at = self.pos + off;
            match input[at] {
                b'"' => {
                    self.pos = at + 1;
                    return Ok(match owned {
                        Some(mut buf) => {
                            buf.extend_from_slice(&input[chunk_start..at]);
                            Cow::Owned(buf)
                        }
                        None => Cow::Borrowed(&input[start..at]),
                    });
                }
                _ => {
                    let Some(&escaped) = input.get(at + 1) else {
                        return Err(self.malformed_at("unterminated quoted element", start));
                    };
                    let buf = owned.get_or_insert_with(Vec::new);
                    buf.extend_from_slice(&input[chunk_start..at]);
                    buf.push(escaped);
                    self.pos = at + 2;
                    chunk_start = self.pos;
                }
            }
        }
    }

    /// Элемент без кавычек до `,` `{` или `}`. Пробелы внутри сохраняются,
    /// хвостовые неэкранированные отбрасываются. Неэкранированный `NULL` в
    /// любом регистре — NULL элемент.
    fn parse_unquoted(&mut self) -> ArrayResult<Option<Cow<'a, [u8]>>> {
        let input = self.input;
        let start = self.pos;
        let mut owned: Option<Vec<u8>> = None;
        let mut chunk_start = self.pos;
        // Конец значимой части: сразу после последнего непробельного или
        // экранированного байта.
        let mut end = self.pos;

        while let Some(b) = self.peek() {
            match b {
                b',' | b'{' | b'}' => break,
                b'"' => return Err(self.malformed("unexpected '\"' inside unquoted element")),
                b'\\' => {
                    let Some(&escaped) = input.get(self.pos + 1) else {
                        return Err(self.malformed("unexpected end of input after '\\'"));
                    };
                    let buf = owned.get_or_insert_with(Vec::new);
                    buf.extend_from_slice(&input[chunk_start..self.pos]);
                    buf.push(escaped);
                    self.pos += 2;
                    chunk_start = self.pos;
                    end = self.pos;
                }
                b if is_array_space(b) => self.pos += 1,
                _ => {
                    self.pos += 1;
                    end = self.pos;
                }
            }
        }

        match owned {
            Some(mut buf) => {
                buf.extend_from_slice(&input[chunk_start..end]);
                Ok(Some(Cow::Owned(buf)))
            }
            None => {
                let token = &input[start..end];
                if token.is_empty() {
                    return Err(self.malformed_at("empty unquoted element", start));
                }
                if token.eq_ignore_ascii_case(b"NULL") {
                    Ok(None)
                } else {
                    Ok(Some(Cow::Borrowed(token)))
                }
            }
        }
    }

    /// Сверяет разобранную вложенность с явными границами.
    fn build_dimensions(
        &self,
        bounds: Option<Vec<(i32, i32)>>,
    ) -> ArrayResult<Vec<Dimension>> {
        let ndims = self.leaf_depth.unwrap_or(0);
        let lengths = &self.lengths[..ndims.min(self.lengths.len())];

        match bounds {
            None => Ok(lengths
                .iter()
                .map(|&len| Dimension::new(len, DEFAULT_LOWER_BOUND))
                .collect()),
            Some(bounds) => {
                if bounds.len() != lengths.len() {
                    return Err(self.malformed(format!(
                        "specified array dimensions ({}) do not match array contents ({})",
                        bounds.len(),
                        lengths.len()
                    )));
                }
                bounds
                    .iter()
                    .zip(lengths)
                    .map(|(&(lo, hi), &len)| {
                        let declared = hi as i64 - lo as i64 + 1;
                        if declared != len as i64 {
                            return Err(self.malformed(format!(
                                "specified bounds [{lo}:{hi}] do not match {len} elements"
                            )));
                        }
                        Ok(Dimension::new(len, lo))
                    })
                    .collect()
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if is_array_space(b)) {
            self.pos += 1;
        }
    }

    fn expect(
        &mut self,
        byte: u8,
    ) -> ArrayResult<()> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.malformed(format!("expected '{}'", byte as char))),
            None => Err(self.malformed(format!(
                "unexpected end of input, expected '{}'",
                byte as char
            ))),
        }
    }

    fn malformed(
        &self,
        reason: impl Into<String>,
    ) -> pgarray_error::StackError {
        self.malformed_at(reason, self.pos)
    }

    fn malformed_at(
        &self,
        reason: impl Into<String>,
        pos: usize,
    ) -> pgarray_error::StackError {
        ArrayError::malformed(WireFormat::Text, reason)
            .with_position(pos)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_default(src: &str) -> ArrayResult<RawTextArray<'_>> {
        parse(src.as_bytes(), &CodecSettings::default())
    }

    fn texts(raw: &RawTextArray<'_>) -> Vec<Option<String>> {
        raw.elements
            .iter()
            .map(|e| e.as_ref().map(|b| String::from_utf8_lossy(b).into_owned()))
            .collect()
    }

    #[test]
    fn test_empty_array() {
        let raw = parse_default("{}").unwrap();
        assert!(raw.dimensions.is_empty());
        assert!(raw.elements.is_empty());

        let raw = parse_default("  {  }  ").unwrap();
        assert!(raw.dimensions.is_empty());
    }

    #[test]
    fn test_two_dimensions() {
        let raw = parse_default("{{1,2,3},{4,5,6}}").unwrap();
        assert_eq!(
            raw.dimensions,
            vec![Dimension::new(2, 1), Dimension::new(3, 1)]
        );
        assert_eq!(texts(&raw).len(), 6);
        assert_eq!(texts(&raw)[5].as_deref(), Some("6"));
    }

    #[test]
    fn test_explicit_bounds() {
        let raw = parse_default("[4:5]={10,20}").unwrap();
        assert_eq!(raw.dimensions, vec![Dimension::new(2, 4)]);

        let raw = parse_default("[-1:0][3:5]={{a,b,c},{d,e,f}}").unwrap();
        assert_eq!(
            raw.dimensions,
            vec![Dimension::new(2, -1), Dimension::new(3, 3)]
        );
    }

    /// Тест проверяет, что только неэкранированный NULL без кавычек — это
    /// NULL элемент.
    #[test]
    fn test_null_markers() {
        let raw = parse_default(r#"{NULL,null,"NULL",N\ULL,nullx}"#).unwrap();
        assert_eq!(
            texts(&raw),
            vec![
                None,
                None,
                Some("NULL".to_string()),
                Some("NULL".to_string()),
                Some("nullx".to_string()),
            ]
        );
    }

    #[test]
    fn test_quoted_escapes() {
        let raw = parse_default(r#"{"a\"b","c\\d","",  " x " }"#).unwrap();
        assert_eq!(
            texts(&raw),
            vec![
                Some("a\"b".to_string()),
                Some("c\\d".to_string()),
                Some(String::new()),
                Some(" x ".to_string()),
            ]
        );
    }

    #[test]
    fn test_quoted_without_escapes_borrows() {
        let raw = parse_default(r#"{"abc"}"#).unwrap();
        assert!(matches!(raw.elements[0], Some(Cow::Borrowed(b"abc"))));
    }

    #[test]
    fn test_unquoted_escape() {
        let raw = parse_default(r"{a\,b}").unwrap();
        assert_eq!(texts(&raw), vec![Some("a,b".to_string())]);
    }

    /// Тест проверяет, что пробелы внутри элемента без кавычек сохраняются,
    /// а хвостовые отбрасываются, если не экранированы.
    #[test]
    fn test_unquoted_inner_whitespace() {
        let raw = parse_default("{a b,c , d\te }").unwrap();
        assert_eq!(
            texts(&raw),
            vec![
                Some("a b".to_string()),
                Some("c".to_string()),
                Some("d\te".to_string()),
            ]
        );

        let raw = parse_default(r"{a\ ,x\ y  }").unwrap();
        assert_eq!(
            texts(&raw),
            vec![Some("a ".to_string()), Some("x y".to_string())]
        );

        let raw = parse_default("{null value}").unwrap();
        assert_eq!(texts(&raw), vec![Some("null value".to_string())]);
    }

    /// Тест проверяет, что `\v` считается пробелом наравне с ASCII-пробелами.
    #[test]
    fn test_vertical_tab_is_whitespace() {
        let raw = parse_default("{\u{0b}x\u{0b},\u{0b}y}").unwrap();
        assert_eq!(
            texts(&raw),
            vec![Some("x".to_string()), Some("y".to_string())]
        );
    }

    #[test]
    fn test_whitespace_around_tokens() {
        let raw = parse_default(" { { 1 , 2 } , { 3 , 4 } } ").unwrap();
        assert_eq!(raw.dimensions.len(), 2);
        assert_eq!(texts(&raw)[3].as_deref(), Some("4"));
    }

    #[test]
    fn test_malformed_inputs() {
        let cases = [
            "",
            "1,2",
            "{1,2",
            "{1,,2}",
            "{1,}",
            "{{1,2},{3}}",
            "{{1},2}",
            "{1,{2}}",
            "{{}}",
            "{{1},{}}",
            "{{1},{{2}}}",
            "{1} x",
            r#"{"abc}"#,
            r#"{ab"c}"#,
            "[1:2]={1}",
            "[1:1][1:1]={1}",
            "[2:0]={}",
            "[1:1]{1}",
            "[x:1]={1}",
            "[1:0]={1}",
        ];
        for src in cases {
            let err = parse_default(src).unwrap_err();
            let arr_err = err.downcast_ref::<ArrayError>().unwrap();
            assert!(arr_err.is_malformed(), "{src:?}: {err}");
        }
    }

    /// Тест проверяет, что явные границы у пустого массива отклоняются.
    #[test]
    fn test_bounds_on_empty_array_rejected() {
        assert!(parse_default("[1:0]={}").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let settings = CodecSettings {
            max_dimensions: 2,
            ..Default::default()
        };
        assert!(parse(b"{{1}}", &settings).is_ok());
        let err = parse(b"{{{1}}}", &settings).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum allowed"));
    }

    #[test]
    fn test_element_limit() {
        let settings = CodecSettings {
            max_elements: 3,
            ..Default::default()
        };
        assert!(parse(b"{1,2,3}", &settings).is_ok());
        assert!(parse(b"{1,2,3,4}", &settings).is_err());
    }

    #[test]
    fn test_error_position_reported() {
        let err = parse_default("{1,2}}").unwrap_err();
        assert!(err.to_string().contains("[position: 5]"), "{err}");
    }
}
