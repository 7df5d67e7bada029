//! 座標文字列パーサー
//!
//! CSVの `coordinates` カラムはリテラル表記の入れ子リストで、
//! 単一の矩形 `[x1, y1, x2, y2]` か矩形のリスト `[[...], [...]]` のどちらか。
//! 数値・文字列・リスト `[...]`・タプル `(...)` を受け付ける。

use crate::error::{Error, Result};
use crate::types::{BoundingBox, Literal};

/// 入れ子の最大深さ（これを超えると再帰せずにエラー）
const MAX_DEPTH: usize = 64;

/// 座標文字列を矩形のリストにパース
///
/// 判定ルール:
/// 1. 先頭要素がリスト `[...]` → 全体を矩形のリストとして扱う
/// 2. それ以外（タプル・数値・文字列） → 全体を1つの矩形として1要素のリストに包む
///
/// 各矩形の形（4要素か、数値か）は検証しない。
///
/// # Arguments
/// * `text` - `coordinates` カラムの文字列
///
/// # Returns
/// * `Ok(Vec<BoundingBox>)` - パース成功
/// * `Err(Error::Parse)` - 不正なリテラル、先頭要素を持たない値（数値・空のシーケンス・空文字列）
///
/// # Examples
/// ```
/// use bbox_viewer_common::parse_boxes;
///
/// let boxes = parse_boxes("[1, 2, 3, 4]").unwrap();
/// assert_eq!(boxes.len(), 1);
/// assert_eq!(boxes[0].as_rect(), Some([1.0, 2.0, 3.0, 4.0]));
/// ```
pub fn parse_boxes(text: &str) -> Result<Vec<BoundingBox>> {
    let value = LiteralParser::new(text).parse().map_err(Error::Parse)?;

    let box_list = first_is_list(&value)?;
    match value {
        Literal::List(items) | Literal::Tuple(items) if box_list => {
            Ok(items.into_iter().map(BoundingBox).collect())
        }
        other => Ok(vec![BoundingBox(other)]),
    }
}

/// 先頭要素がリストかどうか。先頭要素が取れない値はエラー
fn first_is_list(value: &Literal) -> Result<bool> {
    match value {
        Literal::List(items) | Literal::Tuple(items) => match items.first() {
            Some(first) => Ok(matches!(first, Literal::List(_))),
            None => Err(Error::Parse("coordinate sequence is empty".into())),
        },
        Literal::Str(s) if s.is_empty() => {
            Err(Error::Parse("coordinate string literal is empty".into()))
        }
        Literal::Str(_) => Ok(false),
        Literal::Number(n) => Err(Error::Parse(format!(
            "expected a sequence, got number {}",
            n
        ))),
    }
}

/// パース結果と警告
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBoxes {
    pub boxes: Vec<BoundingBox>,
    pub warning: Option<String>,
}

/// 失敗しても止まらないパース
///
/// 失敗時は空のリストと警告メッセージを返す。
pub fn parse_boxes_lenient(text: &str) -> ParsedBoxes {
    match parse_boxes(text) {
        Ok(boxes) => ParsedBoxes { boxes, warning: None },
        Err(err) => {
            let reason = match err {
                Error::Parse(msg) => msg,
                other => other.to_string(),
            };
            let warning = format!("Could not parse coordinates: {}", reason);
            tracing::warn!(coordinates = text, "{}", warning);
            ParsedBoxes {
                boxes: Vec::new(),
                warning: Some(warning),
            }
        }
    }
}

/// 再帰下降パーサー
struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn parse(mut self) -> std::result::Result<Literal, String> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err("empty coordinate string".into());
        }
        let value = self.value()?;
        self.skip_whitespace();
        if let Some(c) = self.peek() {
            return Err(format!("unexpected '{}' at position {}", c, self.pos));
        }
        Ok(value)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn value(&mut self) -> std::result::Result<Literal, String> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => self.sequence(']'),
            Some('(') => self.sequence(')'),
            Some(quote @ ('\'' | '"')) => self.string(quote),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) => Err(format!("unexpected '{}' at position {}", c, self.pos)),
            None => Err("unexpected end of input".into()),
        }
    }

    fn sequence(&mut self, close: char) -> std::result::Result<Literal, String> {
        if self.depth == MAX_DEPTH {
            return Err(format!(
                "nesting deeper than {} levels at position {}",
                MAX_DEPTH, self.pos
            ));
        }
        self.depth += 1;
        let result = self.sequence_items(close);
        self.depth -= 1;
        result
    }

    fn sequence_items(&mut self, close: char) -> std::result::Result<Literal, String> {
        self.bump();
        let mut items = Vec::new();
        let mut saw_comma = false;

        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                break;
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => saw_comma = true,
                Some(c) if c == close => break,
                Some(c) => {
                    return Err(format!(
                        "expected ',' or '{}' but found '{}' at position {}",
                        close,
                        c,
                        self.pos - c.len_utf8()
                    ));
                }
                None => return Err(format!("missing closing '{}'", close)),
            }
        }

        if close == ']' {
            return Ok(Literal::List(items));
        }
        // `(x)` はタプルではなく括弧付きの値
        if items.len() == 1 && !saw_comma {
            return Ok(items.remove(0));
        }
        Ok(Literal::Tuple(items))
    }

    fn string(&mut self, quote: char) -> std::result::Result<Literal, String> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(format!("unterminated string at position {}", start));
                }
                Some(c) if c == quote => return Ok(Literal::Str(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    // 行継続
                    Some('\n') => {}
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => {
                        return Err(format!("unterminated string at position {}", start));
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> std::result::Result<Literal, String> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.' || c == '_') {
            self.bump();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('-' | '+')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }

        let raw = &self.src[start..self.pos];
        raw.replace('_', "")
            .parse::<f64>()
            .map(Literal::Number)
            .map_err(|_| format!("invalid number '{}' at position {}", raw, start))
    }
}
