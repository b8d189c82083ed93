//! Lexical analyzer for NTR source text.
//!
//! The lexer turns each non-comment line into a [`RawRecord`]: the first
//! whitespace-separated token is the record code and every following token
//! is a `key=value` field. Whitespace inside `'...'` or `"..."` does not
//! split a token, and a quoted span may start in the middle of a token
//! (`P1='0, 0, 0'`).
//!
//! The public entry point is [`tokenize`], which never fails: malformed
//! tokens are reported as issues and skipped so that the rest of the file is
//! still read.

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{alt, cut_err, repeat},
    error::{ErrMode, ModalResult},
    stream::{LocatingSlice, Location},
    token::{one_of, take_till, take_while},
};

use crate::{
    error::{ErrorCode, IssueCollector, ParseIssue},
    record::{RawField, RawRecord},
    span::Span,
};

type Input<'a> = LocatingSlice<&'a str>;

/// Record code that marks a comment line.
const COMMENT_CODE: &str = "C";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A whitespace-separated token of one line with its span in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineToken<'a> {
    text: &'a str,
    span: Span,
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// Parse a quoted span, up to and including the matching closing quote.
///
/// Commits after the opening quote; a missing closing quote is a cut error.
fn quoted_span(input: &mut Input<'_>) -> ModalResult<()> {
    let quote = one_of(is_quote).parse_next(input)?;
    cut_err((take_till(0.., quote), quote))
        .void()
        .parse_next(input)
}

/// Parse a run of characters that are neither whitespace nor quotes.
fn bare_run(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(1.., |c: char| !c.is_whitespace() && !is_quote(c))
        .void()
        .parse_next(input)
}

/// Parse one token: bare runs and quoted spans with no whitespace between.
fn token<'a>(input: &mut Input<'a>) -> ModalResult<(&'a str, std::ops::Range<usize>)> {
    repeat::<_, _, (), _, _>(1.., alt((quoted_span, bare_run)))
        .take()
        .with_span()
        .parse_next(input)
}

fn separator(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

/// Split one line into tokens.
///
/// Returns the tokens read before an unterminated quote, if any, and the
/// byte offset (in the line) where the unterminated token starts.
fn line_tokens(line: &str) -> (Vec<LineToken<'_>>, Option<usize>) {
    let mut input = LocatingSlice::new(line);
    let mut tokens = Vec::new();

    loop {
        if separator(&mut input).is_err() || input.is_empty() {
            return (tokens, None);
        }

        let start = input.current_token_start();
        match token(&mut input) {
            Ok((text, range)) => tokens.push(LineToken {
                text,
                span: Span::new(range),
            }),
            Err(ErrMode::Cut(_)) => return (tokens, Some(start)),
            // A non-empty line at a non-whitespace character always yields a token.
            Err(_) => return (tokens, None),
        }
    }
}

/// Strip matching surrounding quotes, or trim unquoted text.
///
/// Returns the value and whether it was quoted.
fn unquote(raw_value: &str) -> (String, bool) {
    let mut chars = raw_value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if is_quote(first) && first == last => {
            let inner = &raw_value[first.len_utf8()..raw_value.len() - last.len_utf8()];
            (inner.to_string(), true)
        }
        _ => (raw_value.trim().to_string(), false),
    }
}

/// Returns `true` if the line is a comment record.
fn is_comment(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|code| code.eq_ignore_ascii_case(COMMENT_CODE))
}

/// Lexer that accumulates records and issues line by line.
struct Lexer {
    records: Vec<RawRecord>,
    issues: IssueCollector,
}

impl Lexer {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            issues: IssueCollector::new(),
        }
    }

    /// Lex one line starting at byte `offset` of the source.
    fn lex_line(&mut self, line: &str, line_number: usize, offset: usize) {
        if line.trim().is_empty() || is_comment(line) {
            return;
        }

        let (tokens, unterminated) = line_tokens(line);
        let unterminated = unterminated.map(|start| Span::new(start..line.len()).shift(offset));

        let Some((first, rest)) = tokens.split_first() else {
            if let Some(span) = unterminated {
                self.emit_unterminated(None, line_number, span);
            }
            return;
        };

        if first.text.contains('=') {
            self.issues.emit(
                ParseIssue::error(format!(
                    "missing record code before field `{}`",
                    first.text
                ))
                .with_code(ErrorCode::E004)
                .at_line(line_number)
                .with_span(first.span.shift(offset)),
            );
            return;
        }

        let code = first.text.to_uppercase();
        let mut span = first.span.shift(offset);
        let mut fields = Vec::with_capacity(rest.len());

        for token in rest {
            let token_span = token.span.shift(offset);
            span = span.union(token_span);

            if let Some(field) = self.lex_field(&code, token.text, line_number, token_span) {
                fields.push(field);
            }
        }

        if let Some(unterminated_span) = unterminated {
            self.emit_unterminated(Some(&code), line_number, unterminated_span);
            span = span.union(unterminated_span);
        }

        trace!(code = code.as_str(), line_number, fields = fields.len(); "Lexed record");
        self.records.push(RawRecord {
            code,
            line_number,
            span,
            fields,
        });
    }

    /// Turn one `key=value` token into a field, or report why it can't be.
    fn lex_field(
        &mut self,
        code: &str,
        text: &str,
        line_number: usize,
        span: Span,
    ) -> Option<RawField> {
        let Some((key, raw_value)) = text.split_once('=') else {
            self.issues.emit(
                ParseIssue::error(format!("expected key=value pair, found `{text}`"))
                    .with_code(ErrorCode::E001)
                    .with_record_code(code)
                    .at_line(line_number)
                    .with_span(span),
            );
            return None;
        };

        let key = key.trim().to_uppercase();
        if key.is_empty() {
            self.issues.emit(
                ParseIssue::error(format!("missing field key before `={raw_value}`"))
                    .with_code(ErrorCode::E003)
                    .with_record_code(code)
                    .at_line(line_number)
                    .with_span(span),
            );
            return None;
        }

        let (value, quoted) = unquote(raw_value);
        Some(RawField {
            key,
            raw_value: raw_value.to_string(),
            value,
            quoted,
            line_number,
            span,
        })
    }

    fn emit_unterminated(&mut self, code: Option<&str>, line_number: usize, span: Span) {
        let mut issue = ParseIssue::error("unterminated quoted value")
            .with_code(ErrorCode::E002)
            .at_line(line_number)
            .with_details("the rest of the line was ignored")
            .with_span(span);
        if let Some(code) = code {
            issue = issue.with_record_code(code);
        }
        self.issues.emit(issue);
    }

    fn finish(self) -> (Vec<RawRecord>, Vec<ParseIssue>) {
        debug!(
            records = self.records.len(),
            errors = self.issues.error_count();
            "Tokenized source"
        );
        (self.records, self.issues.into_issues())
    }
}

/// Split source text into raw records, collecting lexical issues.
///
/// Lines are separated by `\n`; a trailing `\r` is ignored and a leading
/// byte order mark is skipped. Blank lines and comment lines (record code
/// `C`) produce nothing. Spans are byte offsets into `source`.
///
/// # Example
///
/// ```
/// # use ntr_parser::tokenize;
/// let (records, issues) = tokenize("RO P1='0, 0, 0' P2=K1 DN=DN100");
///
/// assert!(issues.is_empty());
/// assert_eq!(records[0].code, "RO");
/// assert_eq!(records[0].fields[0].value, "0, 0, 0");
/// assert!(records[0].fields[0].quoted);
/// assert_eq!(records[0].fields[1].value, "K1");
/// ```
pub fn tokenize(source: &str) -> (Vec<RawRecord>, Vec<ParseIssue>) {
    let mut lexer = Lexer::new();

    let mut offset = 0;
    let body = match source.strip_prefix(BYTE_ORDER_MARK) {
        Some(body) => {
            offset = BYTE_ORDER_MARK.len_utf8();
            body
        }
        None => source,
    };

    for (index, line) in body.split('\n').enumerate() {
        let content = line.strip_suffix('\r').unwrap_or(line);
        lexer.lex_line(content, index + 1, offset);
        offset += line.len() + 1;
    }

    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_ok(source: &str) -> Vec<RawRecord> {
        let (records, issues) = tokenize(source);
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
        records
    }

    fn codes(issues: &[ParseIssue]) -> Vec<Option<ErrorCode>> {
        issues.iter().map(ParseIssue::code).collect()
    }

    #[test]
    fn test_token_parser() {
        let mut input = LocatingSlice::new("P1='0, 0, 0' rest");
        let (text, range) = token(&mut input).unwrap();
        assert_eq!(text, "P1='0, 0, 0'");
        assert_eq!(range, 0..12);
    }

    #[test]
    fn test_token_parser_unterminated_is_cut() {
        let mut input = LocatingSlice::new("P1='0, 0");
        assert!(matches!(token(&mut input), Err(ErrMode::Cut(_))));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'a b'"), ("a b".to_string(), true));
        assert_eq!(unquote("\"x\""), ("x".to_string(), true));
        assert_eq!(unquote("''"), (String::new(), true));
        assert_eq!(unquote(" plain "), ("plain".to_string(), false));
        assert_eq!(unquote("'"), ("'".to_string(), false));
        assert_eq!(unquote("'mixed\""), ("'mixed\"".to_string(), false));
        assert_eq!(unquote("a'b c'"), ("a'b c'".to_string(), false));
    }

    #[test]
    fn test_simple_record() {
        let records = lex_ok("RO P1='0,0,0' P2='5,0,0' DN=DN150");

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.code, "RO");
        assert_eq!(record.line_number, 1);
        assert_eq!(record.fields.len(), 3);
        assert_eq!(record.fields[0].key, "P1");
        assert_eq!(record.fields[0].raw_value, "'0,0,0'");
        assert_eq!(record.fields[0].value, "0,0,0");
        assert!(record.fields[0].quoted);
        assert_eq!(record.fields[2].value, "DN150");
        assert!(!record.fields[2].quoted);
    }

    #[test]
    fn test_keys_and_codes_are_upper_cased() {
        let records = lex_ok("ro p1=K1 dn=dn100");
        assert_eq!(records[0].code, "RO");
        assert_eq!(records[0].fields[0].key, "P1");
        // Values keep their case.
        assert_eq!(records[0].fields[1].value, "dn100");
    }

    #[test]
    fn test_quoted_value_keeps_inner_whitespace() {
        let records = lex_ok("RO TEXT=\"main header, north\" MAT='P235 GH'");
        assert_eq!(records[0].fields[0].value, "main header, north");
        assert_eq!(records[0].fields[1].value, "P235 GH");
    }

    #[test]
    fn test_mismatched_quote_kinds_do_not_close() {
        let records = lex_ok("RO TEXT=\"it's fine\"");
        assert_eq!(records[0].fields[0].value, "it's fine");
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        let records = lex_ok("\n   \nC this is a comment\nc also = comment\nRO P1=A P2=B DN=X\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_number, 5);
    }

    #[test]
    fn test_comment_code_needs_word_boundary() {
        let (records, _) = tokenize("CX A=1");
        assert_eq!(records[0].code, "CX");
    }

    #[test]
    fn test_crlf_line_endings() {
        let records = lex_ok("RO P1=A\r\nRED P1=B\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields[0].value, "A");
        assert_eq!(records[1].line_number, 2);
    }

    #[test]
    fn test_spans_point_into_source() {
        let source = "C header\nRO  P1=K1 DN=DN100\n";
        let records = lex_ok(source);
        let record = &records[0];

        let field = &record.fields[0];
        assert_eq!(&source[field.span.start()..field.span.end()], "P1=K1");
        assert_eq!(
            &source[record.span.start()..record.span.end()],
            "RO  P1=K1 DN=DN100"
        );
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let source = "\u{feff}RO P1=K1";
        let records = lex_ok(source);
        assert_eq!(records[0].code, "RO");
        let span = records[0].fields[0].span;
        assert_eq!(&source[span.start()..span.end()], "P1=K1");
    }

    #[test]
    fn test_token_without_equals() {
        let (records, issues) = tokenize("RO P1=A stray P2=B");

        assert_eq!(codes(&issues), vec![Some(ErrorCode::E001)]);
        assert!(issues[0].message().contains("stray"));
        assert_eq!(issues[0].record_code(), Some("RO"));
        assert_eq!(issues[0].line_number(), Some(1));
        assert_eq!(records[0].fields.len(), 2);
    }

    #[test]
    fn test_empty_key() {
        let (records, issues) = tokenize("RO =B P1=A");
        assert_eq!(codes(&issues), vec![Some(ErrorCode::E003)]);
        assert_eq!(records[0].fields.len(), 1);
    }

    #[test]
    fn test_missing_record_code() {
        let (records, issues) = tokenize("P1=A P2=B\nRO P1=A");
        assert_eq!(codes(&issues), vec![Some(ErrorCode::E004)]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_number, 2);
    }

    #[test]
    fn test_unterminated_quote_keeps_earlier_fields() {
        let source = "RO DN=DN100 P1='0, 0, 0 P2=K2\nRED P1=A";
        let (records, issues) = tokenize(source);

        assert_eq!(codes(&issues), vec![Some(ErrorCode::E002)]);
        assert_eq!(issues[0].line_number(), Some(1));
        let span = issues[0].span().unwrap();
        assert_eq!(&source[span.start()..span.end()], "P1='0, 0, 0 P2=K2");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields.len(), 1);
        assert_eq!(records[0].fields[0].key, "DN");
        assert_eq!(records[1].code, "RED");
    }

    #[test]
    fn test_unterminated_quote_in_record_code() {
        let (records, issues) = tokenize("'RO P1=A");
        assert!(records.is_empty());
        assert_eq!(codes(&issues), vec![Some(ErrorCode::E002)]);
        assert_eq!(issues[0].record_code(), None);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let records = lex_ok("RO TEXT=a=b");
        assert_eq!(records[0].fields[0].key, "TEXT");
        assert_eq!(records[0].fields[0].value, "a=b");
    }

    #[test]
    fn test_multiple_issues_across_lines() {
        let (records, issues) = tokenize("RO junk\n=x\nDN NAME=A DA=1 oops");
        assert_eq!(records.len(), 2);
        assert_eq!(
            codes(&issues),
            vec![Some(ErrorCode::E001), Some(ErrorCode::E004), Some(ErrorCode::E001)]
        );
        let lines: Vec<_> = issues.iter().map(ParseIssue::line_number).collect();
        assert_eq!(lines, vec![Some(1), Some(2), Some(3)]);
    }
}
