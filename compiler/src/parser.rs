use crate::{
    tokenizer::Token,
    types::{Declarations, Definition, DefinitionKind, Field, TypeExpr},
    utils::{error, quote},
    error::CompileError,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER:     Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref EQUALS:         Regex = Regex::new(r"^=$").unwrap();
    static ref SEMICOLON:      Regex = Regex::new(r"^;$").unwrap();
    static ref INTEGER:        Regex = Regex::new(r"^\d+$").unwrap();
    static ref STRING:         Regex = Regex::new(r#"^"[^"\n]*"$"#).unwrap();
    static ref LEFT_BRACE:     Regex = Regex::new(r"^\{$").unwrap();
    static ref RIGHT_BRACE:    Regex = Regex::new(r"^\}$").unwrap();
    static ref LEFT_BRACKET:   Regex = Regex::new(r"^\[$").unwrap();
    static ref RIGHT_BRACKET:  Regex = Regex::new(r"^\]$").unwrap();
    static ref STRUCT_KEYWORD: Regex = Regex::new(r"^struct$").unwrap();
    static ref TYPE_KEYWORD:   Regex = Regex::new(r"^type$").unwrap();
    static ref MAP_KEYWORD:    Regex = Regex::new(r"^map$").unwrap();
    static ref PRIV_KEYWORD:   Regex = Regex::new(r"^priv$").unwrap();
    static ref EOF:            Regex = Regex::new(r"^$").unwrap();
}

/// Words that cannot name a field or a declared type.
pub const KEYWORDS: [&str; 4] = ["struct", "type", "map", "priv"];

fn current_token(tokens: &[Token], index: usize) -> &Token {
    // the tokenizer always ends the stream with an EOF token
    &tokens[index.min(tokens.len() - 1)]
}

fn eat(tokens: &[Token], index: &mut usize, test: &Regex) -> bool {
    if test.is_match(&current_token(tokens, *index).text) {
        *index += 1;
        true
    } else {
        false
    }
}

fn expect(tokens: &[Token], index: &mut usize, test: &Regex, expected: &str) -> Result<(), CompileError> {
    if !eat(tokens, index, test) {
        let tok = current_token(tokens, *index);
        return Err(error(
            &format!("Expected {} but found {}", expected, quote(&tok.text)),
            tok.line,
            tok.column,
        ));
    }
    Ok(())
}

fn unexpected_token(tokens: &[Token], index: usize) -> CompileError {
    let tok = current_token(tokens, index);
    error(
        &format!("Unexpected token {}", quote(&tok.text)),
        tok.line,
        tok.column,
    )
}

fn expect_name(tokens: &[Token], index: &mut usize) -> Result<Token, CompileError> {
    let tok = current_token(tokens, *index).clone();
    if KEYWORDS.contains(&tok.text.as_str()) {
        return Err(error(
            &format!("Expected identifier but found keyword {}", quote(&tok.text)),
            tok.line,
            tok.column,
        ));
    }
    expect(tokens, index, &IDENTIFIER, "identifier")?;
    Ok(tok)
}

fn parse_type(tokens: &[Token], index: &mut usize) -> Result<TypeExpr, CompileError> {
    if eat(tokens, index, &LEFT_BRACKET) {
        if eat(tokens, index, &RIGHT_BRACKET) {
            let elem = parse_type(tokens, index)?;
            return Ok(TypeExpr::List { elem: Box::new(elem) });
        }

        let len_tok = current_token(tokens, *index).clone();
        expect(tokens, index, &INTEGER, "array length")?;
        let length = len_tok.text.parse::<usize>().map_err(|_| {
            error(
                &format!("Invalid array length {}", quote(&len_tok.text)),
                len_tok.line,
                len_tok.column,
            )
        })?;
        expect(tokens, index, &RIGHT_BRACKET, "\"]\"")?;
        let elem = parse_type(tokens, index)?;
        return Ok(TypeExpr::FixedArray { length, elem: Box::new(elem) });
    }

    if eat(tokens, index, &MAP_KEYWORD) {
        expect(tokens, index, &LEFT_BRACKET, "\"[\"")?;
        let key = parse_type(tokens, index)?;
        expect(tokens, index, &RIGHT_BRACKET, "\"]\"")?;
        let value = parse_type(tokens, index)?;
        return Ok(TypeExpr::Map { key: Box::new(key), value: Box::new(value) });
    }

    let tok = expect_name(tokens, index)?;
    Ok(TypeExpr::Named { name: tok.text, line: tok.line, column: tok.column })
}

fn parse_field(tokens: &[Token], index: &mut usize) -> Result<Field, CompileError> {
    let private = eat(tokens, index, &PRIV_KEYWORD);
    let name_tok = expect_name(tokens, index)?;
    let type_ = parse_type(tokens, index)?;

    let tag_tok = current_token(tokens, *index);
    let tag = if eat(tokens, index, &STRING) {
        Some(tag_tok.text[1..tag_tok.text.len() - 1].to_owned())
    } else {
        None
    };

    expect(tokens, index, &SEMICOLON, "\";\"")?;

    Ok(Field {
        name:    name_tok.text,
        line:    name_tok.line,
        column:  name_tok.column,
        type_,
        private,
        tag,
    })
}

pub fn parse_schema(tokens: &[Token]) -> Result<Declarations, CompileError> {
    let mut definitions = Vec::new();
    let mut index       = 0;

    if tokens.is_empty() {
        return Ok(Declarations { definitions });
    }

    // Parse definitions one by one
    while !eat(tokens, &mut index, &EOF) {
        if eat(tokens, &mut index, &STRUCT_KEYWORD) {
            let name_tok = expect_name(tokens, &mut index)?;
            expect(tokens, &mut index, &LEFT_BRACE, "\"{\"")?;

            // Collect fields
            let mut fields = Vec::new();
            while !eat(tokens, &mut index, &RIGHT_BRACE) {
                if current_token(tokens, index).text.is_empty() {
                    return Err(unexpected_token(tokens, index));
                }
                fields.push(parse_field(tokens, &mut index)?);
            }

            definitions.push(Definition {
                name:   name_tok.text,
                line:   name_tok.line,
                column: name_tok.column,
                kind:   DefinitionKind::Struct(fields),
            });
        } else if eat(tokens, &mut index, &TYPE_KEYWORD) {
            let name_tok = expect_name(tokens, &mut index)?;
            expect(tokens, &mut index, &EQUALS, "\"=\"")?;
            let aliased = parse_type(tokens, &mut index)?;
            expect(tokens, &mut index, &SEMICOLON, "\";\"")?;

            definitions.push(Definition {
                name:   name_tok.text,
                line:   name_tok.line,
                column: name_tok.column,
                kind:   DefinitionKind::Alias(aliased),
            });
        } else {
            return Err(unexpected_token(tokens, index));
        }
    }

    Ok(Declarations { definitions })
}
