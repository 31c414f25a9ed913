//! The placeholder language used by plugin templates.
//!
//! Templates are plain text with `{{ ... }}` actions:
//!
//! ```text
//! {{# comments are dropped }}
//! background = {{ hex background }}
//! border = {{ rgba accent1 0.8 }}
//! {{ if wallpaper }}path = {{ wallpaper }}{{ end }}
//! {{ if has warning }}...{{ else }}...{{ end }}
//! ```
//!
//! Colour helpers take a role name and fall back to the documented default
//! colour when the palette does not assign it. Conditionals test `has ROLE`,
//! `wallpaper`, `dark`, or `light` and may nest.

use std::str;
use std::sync::LazyLock;

use regex::Regex;

use super::TemplateError;
use crate::colour::{ColourRole, ThemeData, ThemeType};

static ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{(.*?)\}\}").unwrap_or_else(|err| unreachable!("invalid action pattern: {err}"))
});

/// A parsed template ready to be rendered against theme data.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Call { helper: Helper, line: usize },
    If { condition: Condition, then: Vec<Node>, otherwise: Vec<Node> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Helper {
    Hex(ColourRole),
    HexAlpha(ColourRole, Option<f64>),
    HexNoHash(ColourRole),
    Rgb(ColourRole),
    Rgba(ColourRole, Option<f64>),
    RgbDecimal(ColourRole),
    ThemeType,
    ThemeName,
    Wallpaper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Condition {
    Has(ColourRole),
    Wallpaper,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(f64),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Ident(ident) => ident.clone(),
            Self::Str(text) => format!("{text:?}"),
            Self::Number(number) => number.to_string(),
        }
    }
}

enum Action {
    Comment,
    Call(Helper),
    If(Condition),
    Else,
    End,
}

struct Block {
    condition: Condition,
    line: usize,
    then: Vec<Node>,
    otherwise: Option<Vec<Node>>,
}

fn parse_error(line: usize, message: impl Into<String>) -> TemplateError {
    TemplateError::Parse { line, message: message.into() }
}

fn line_at(source: &str, offset: usize) -> usize {
    source[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Where new nodes go: the innermost open branch, or the top level.
fn current<'a>(root: &'a mut Vec<Node>, stack: &'a mut [Block]) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(Block { otherwise: Some(otherwise), .. }) => otherwise,
        Some(block) => &mut block.then,
        None => root,
    }
}

impl Template {
    /// Parses template source.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] with the 1-based line of the first
    /// problem: invalid UTF-8, an unterminated or unknown action, an unknown
    /// colour role, or unbalanced `if`/`else`/`end`.
    pub fn parse(name: &str, source: &[u8]) -> Result<Self, TemplateError> {
        let source = str::from_utf8(source).map_err(|err| {
            let line = line_at(
                str::from_utf8(&source[..err.valid_up_to()]).unwrap_or_default(),
                err.valid_up_to(),
            );
            parse_error(line, "template is not valid UTF-8")
        })?;

        let mut root = Vec::new();
        let mut stack: Vec<Block> = Vec::new();
        let mut cursor = 0;

        for captures in ACTION.captures_iter(source) {
            let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let line = line_at(source, whole.start());

            push_text(current(&mut root, &mut stack), &source[cursor..whole.start()]);
            cursor = whole.end();

            match parse_action(inner.as_str(), line)? {
                Action::Comment => {}
                Action::Call(helper) => {
                    current(&mut root, &mut stack).push(Node::Call { helper, line });
                }
                Action::If(condition) => {
                    stack.push(Block { condition, line, then: Vec::new(), otherwise: None });
                }
                Action::Else => match stack.last_mut() {
                    Some(block) if block.otherwise.is_none() => block.otherwise = Some(Vec::new()),
                    Some(_) => return Err(parse_error(line, "duplicate {{ else }}")),
                    None => return Err(parse_error(line, "{{ else }} outside of {{ if }}")),
                },
                Action::End => {
                    let block = stack
                        .pop()
                        .ok_or_else(|| parse_error(line, "{{ end }} without matching {{ if }}"))?;
                    current(&mut root, &mut stack).push(Node::If {
                        condition: block.condition,
                        then: block.then,
                        otherwise: block.otherwise.unwrap_or_default(),
                    });
                }
            }
        }

        let rest = &source[cursor..];
        if let Some(offset) = rest.find("{{") {
            return Err(parse_error(line_at(source, cursor + offset), "unterminated action"));
        }
        push_text(current(&mut root, &mut stack), rest);

        if let Some(block) = stack.last() {
            return Err(parse_error(block.line, "{{ if }} is never closed with {{ end }}"));
        }

        Ok(Self { name: name.to_string(), nodes: root })
    }

    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// Renders the template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Execute`] if a helper cannot produce a value,
    /// such as `wallpaper` without a wallpaper path.
    pub fn render(&self, data: &ThemeData) -> Result<Vec<u8>, TemplateError> {
        let mut out = String::new();
        render_nodes(&self.nodes, data, &mut out)?;
        Ok(out.into_bytes())
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn tokenize(inner: &str, line: usize) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut chars = inner.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some((_, ch)) = chars.next() {
                match ch {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some((_, escaped)) => text.push(escaped),
                        None => break,
                    },
                    _ => text.push(ch),
                }
            }
            if !closed {
                return Err(parse_error(line, "unterminated string"));
            }
            tokens.push(Token::Str(text));
        } else if ch.is_ascii_digit() || ch == '.' {
            let mut end = start;
            while let Some(&(idx, ch)) = chars.peek() {
                if !(ch.is_ascii_digit() || ch == '.') {
                    break;
                }
                end = idx + ch.len_utf8();
                chars.next();
            }
            let literal = &inner[start..end];
            let number = literal
                .parse::<f64>()
                .map_err(|_| parse_error(line, format!("invalid number {literal:?}")))?;
            tokens.push(Token::Number(number));
        } else if ch.is_alphanumeric() || ch == '_' {
            let mut end = start;
            while let Some(&(idx, ch)) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                end = idx + ch.len_utf8();
                chars.next();
            }
            tokens.push(Token::Ident(inner[start..end].to_string()));
        } else {
            return Err(parse_error(line, format!("unexpected character {ch:?}")));
        }
    }

    Ok(tokens)
}

fn parse_action(inner: &str, line: usize) -> Result<Action, TemplateError> {
    if inner.trim_start().starts_with('#') {
        return Ok(Action::Comment);
    }

    let tokens = tokenize(inner, line)?;
    let Some((head, args)) = tokens.split_first() else {
        return Err(parse_error(line, "empty action"));
    };
    let Token::Ident(keyword) = head else {
        return Err(parse_error(line, format!("expected a helper name, found {}", head.describe())));
    };

    let action = match keyword.as_str() {
        "if" => Action::If(parse_condition(args, line)?),
        "else" => {
            expect_no_args("else", args, line)?;
            Action::Else
        }
        "end" => {
            expect_no_args("end", args, line)?;
            Action::End
        }
        "hex" => Action::Call(Helper::Hex(role_only(keyword, args, line)?)),
        "hexNoHash" => Action::Call(Helper::HexNoHash(role_only(keyword, args, line)?)),
        "rgb" => Action::Call(Helper::Rgb(role_only(keyword, args, line)?)),
        "rgbDecimal" => Action::Call(Helper::RgbDecimal(role_only(keyword, args, line)?)),
        "hexAlpha" => {
            let (role, alpha) = role_with_alpha(keyword, args, line)?;
            Action::Call(Helper::HexAlpha(role, alpha))
        }
        "rgba" => {
            let (role, alpha) = role_with_alpha(keyword, args, line)?;
            Action::Call(Helper::Rgba(role, alpha))
        }
        "themeType" => {
            expect_no_args(keyword, args, line)?;
            Action::Call(Helper::ThemeType)
        }
        "themeName" => {
            expect_no_args(keyword, args, line)?;
            Action::Call(Helper::ThemeName)
        }
        "wallpaper" => {
            expect_no_args(keyword, args, line)?;
            Action::Call(Helper::Wallpaper)
        }
        other => return Err(parse_error(line, format!("unknown helper {other:?}"))),
    };

    Ok(action)
}

fn expect_no_args(keyword: &str, args: &[Token], line: usize) -> Result<(), TemplateError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(parse_error(line, format!("{keyword} takes no arguments")))
    }
}

fn parse_role(token: &Token, line: usize) -> Result<ColourRole, TemplateError> {
    match token {
        Token::Ident(name) | Token::Str(name) => {
            name.parse().map_err(|err| parse_error(line, format!("{err}")))
        }
        Token::Number(_) => {
            Err(parse_error(line, format!("expected a colour role, found {}", token.describe())))
        }
    }
}

fn role_only(keyword: &str, args: &[Token], line: usize) -> Result<ColourRole, TemplateError> {
    match args {
        [role] => parse_role(role, line),
        _ => Err(parse_error(line, format!("{keyword} expects exactly one colour role"))),
    }
}

fn role_with_alpha(
    keyword: &str,
    args: &[Token],
    line: usize,
) -> Result<(ColourRole, Option<f64>), TemplateError> {
    match args {
        [role] => Ok((parse_role(role, line)?, None)),
        [role, Token::Number(alpha)] if (0.0..=1.0).contains(alpha) => {
            Ok((parse_role(role, line)?, Some(*alpha)))
        }
        [_, Token::Number(alpha)] => {
            Err(parse_error(line, format!("alpha {alpha} is outside 0..=1")))
        }
        _ => Err(parse_error(line, format!("{keyword} expects a colour role and an optional alpha"))),
    }
}

fn parse_condition(args: &[Token], line: usize) -> Result<Condition, TemplateError> {
    let keyword = match args.first() {
        Some(Token::Ident(keyword)) => keyword.as_str(),
        _ => return Err(parse_error(line, "if expects has ROLE, wallpaper, dark, or light")),
    };

    match (keyword, &args[1..]) {
        ("has", [role]) => Ok(Condition::Has(parse_role(role, line)?)),
        ("wallpaper", []) => Ok(Condition::Wallpaper),
        ("dark", []) => Ok(Condition::Dark),
        ("light", []) => Ok(Condition::Light),
        ("has", _) => Err(parse_error(line, "if has expects exactly one colour role")),
        (other, _) => Err(parse_error(line, format!("unknown condition {other:?}"))),
    }
}

fn render_nodes(nodes: &[Node], data: &ThemeData, out: &mut String) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Call { helper, line } => out.push_str(&call(*helper, *line, data)?),
            Node::If { condition, then, otherwise } => {
                let branch = if holds(*condition, data) { then } else { otherwise };
                render_nodes(branch, data, out)?;
            }
        }
    }
    Ok(())
}

fn holds(condition: Condition, data: &ThemeData) -> bool {
    match condition {
        Condition::Has(role) => data.palette.has(role),
        Condition::Wallpaper => data.wallpaper_path.is_some(),
        Condition::Dark => data.theme_type() == ThemeType::Dark,
        Condition::Light => data.theme_type() == ThemeType::Light,
    }
}

fn call(helper: Helper, line: usize, data: &ThemeData) -> Result<String, TemplateError> {
    let rgba = |role| data.colour(role).rgba();
    let value = match helper {
        Helper::Hex(role) => rgba(role).hex(),
        Helper::HexAlpha(role, alpha) => {
            alpha.map_or_else(|| rgba(role), |alpha| rgba(role).with_alpha(alpha)).hex_alpha()
        }
        Helper::HexNoHash(role) => rgba(role).hex_no_hash(),
        Helper::Rgb(role) => rgba(role).css_rgb(),
        Helper::Rgba(role, alpha) => {
            alpha.map_or_else(|| rgba(role), |alpha| rgba(role).with_alpha(alpha)).css_rgba()
        }
        Helper::RgbDecimal(role) => rgba(role).rgb_decimal(),
        Helper::ThemeType => data.theme_type().as_str().to_string(),
        Helper::ThemeName => data.theme_name.clone().unwrap_or_else(|| "pigment".to_string()),
        Helper::Wallpaper => data
            .wallpaper_path
            .as_ref()
            .map(|path| path.display().to_string())
            .ok_or_else(|| TemplateError::Execute {
                line,
                message: "wallpaper requested but no wallpaper path was provided".to_string(),
            })?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::colour::CategorisedPalette;

    fn data() -> ThemeData {
        let palette = CategorisedPalette::new(ThemeType::Dark)
            .with(ColourRole::Background, "#101010")
            .unwrap()
            .with(ColourRole::Accent1, "#ff8800")
            .unwrap();
        ThemeData::new(palette)
    }

    fn render(source: &str, data: &ThemeData) -> String {
        let template = Template::parse("test", source.as_bytes()).unwrap();
        String::from_utf8(template.render(data).unwrap()).unwrap()
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(render("no actions here\n", &data()), "no actions here\n");
    }

    #[test]
    fn test_colour_helpers() {
        let out = render(
            "{{ hex background }} {{hexNoHash accent1}} {{ rgb accent1 }} {{ rgbDecimal background }}",
            &data(),
        );
        assert_eq!(out, "#101010 ff8800 rgb(255,136,0) 16,16,16");
    }

    #[test]
    fn test_alpha_helpers() {
        let out = render("{{ hexAlpha accent1 }} {{ hexAlpha accent1 0.5 }} {{ rgba background 0.25 }}", &data());
        assert_eq!(out, "#ff8800ff #ff880080 rgba(16,16,16,0.251)");
    }

    #[test]
    fn test_missing_role_uses_fallback() {
        assert_eq!(render("{{ hex danger }}", &data()), "#f7768e");
    }

    #[test]
    fn test_quoted_role_argument() {
        assert_eq!(render(r#"{{ hex "accent1" }}"#, &data()), "#ff8800");
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(render("a{{# ignored }}b", &data()), "ab");
    }

    #[test]
    fn test_theme_helpers() {
        let named = data().with_theme_name(Some("dusk".to_string()));
        assert_eq!(render("{{ themeType }}/{{ themeName }}", &named), "dark/dusk");
        assert_eq!(render("{{ themeName }}", &data()), "pigment");
    }

    #[test]
    fn test_conditionals() {
        let source = "{{ if has accent1 }}yes{{ else }}no{{ end }}-{{ if has danger }}yes{{ else }}no{{ end }}";
        assert_eq!(render(source, &data()), "yes-no");

        let source = "{{ if dark }}D{{ end }}{{ if light }}L{{ end }}";
        assert_eq!(render(source, &data()), "D");
    }

    #[test]
    fn test_nested_conditionals() {
        let source = "{{ if dark }}[{{ if wallpaper }}{{ wallpaper }}{{ else }}none{{ end }}]{{ end }}";
        assert_eq!(render(source, &data()), "[none]");

        let with_wallpaper = data().with_wallpaper(Some(PathBuf::from("/w/a.png")));
        assert_eq!(render(source, &with_wallpaper), "[/w/a.png]");
    }

    #[test]
    fn test_wallpaper_without_path_fails_at_execution() {
        let template = Template::parse("t", b"line one\n{{ wallpaper }}").unwrap();
        let err = template.render(&data()).unwrap_err();
        assert!(matches!(err, TemplateError::Execute { line: 2, .. }));
    }

    #[test]
    fn test_unknown_role_is_a_parse_error() {
        let err = Template::parse("t", b"\n\n{{ hex accent9 }}").unwrap_err();
        assert!(matches!(err, TemplateError::Parse { line: 3, .. }));
        assert!(err.to_string().contains("accent9"));
    }

    #[test]
    fn test_unknown_helper_is_a_parse_error() {
        let err = Template::parse("t", b"{{ shout background }}").unwrap_err();
        assert!(err.to_string().contains("shout"));
    }

    #[test]
    fn test_unterminated_action() {
        let err = Template::parse("t", b"ok\n{{ hex background").unwrap_err();
        assert!(matches!(err, TemplateError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_unbalanced_blocks() {
        assert!(Template::parse("t", b"{{ if dark }}open").is_err());
        assert!(Template::parse("t", b"{{ end }}").is_err());
        assert!(Template::parse("t", b"{{ else }}").is_err());
        assert!(Template::parse("t", b"{{ if dark }}{{ else }}{{ else }}{{ end }}").is_err());
    }

    #[test]
    fn test_alpha_out_of_range() {
        assert!(Template::parse("t", b"{{ rgba background 1.5 }}").is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(Template::parse("t", &[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let template = Template::parse("t", b"{{ hex background }}{{ rgba accent1 0.8 }}").unwrap();
        assert_eq!(template.render(&data()).unwrap(), template.render(&data()).unwrap());
    }
}
