//! Parser for the textual unit payload format.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::base::QualifiedName;
use crate::error::PayloadError;
use crate::unit::{Body, Member, MemberKind, ParamType, Signature, UnitDecl};

#[derive(Parser)]
#[grammar = "payload/units.pest"]
struct UnitsParser;

/// Parse payload bytes (UTF-8 text) into unit declarations.
pub fn parse_payload_bytes(bytes: &[u8]) -> Result<Vec<UnitDecl>, PayloadError> {
    let source = std::str::from_utf8(bytes).map_err(|_| PayloadError::Encoding)?;
    parse_units(source)
}

/// Parse payload text into unit declarations, in declaration order.
pub fn parse_units(source: &str) -> Result<Vec<UnitDecl>, PayloadError> {
    let mut pairs = UnitsParser::parse(Rule::file, source).map_err(|err| PayloadError::Syntax {
        message: err.to_string(),
    })?;
    let Some(file) = pairs.next() else {
        return Ok(Vec::new());
    };

    let mut package = None;
    let mut units = Vec::new();
    for pair in file.into_inner() {
        match pair.as_rule() {
            Rule::package_decl => {
                package = pair.into_inner().next().map(|path| path.as_str());
            }
            Rule::unit_decl => {
                if let Some(decl) = pair.into_inner().next() {
                    units.push(lower_unit(decl, package)?);
                }
            }
            _ => {}
        }
    }
    Ok(units)
}

fn lower_unit(pair: Pair<'_, Rule>, package: Option<&str>) -> Result<UnitDecl, PayloadError> {
    let is_interface = pair.as_rule() == Rule::interface_decl;
    let mut is_abstract = false;
    let mut name = None;
    let mut parent = None;
    let mut capabilities = Vec::new();
    let mut members = Vec::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::abstract_kw => is_abstract = true,
            Rule::path => name = Some(QualifiedName::qualify(package, part.as_str())),
            Rule::extends_clause => {
                parent = part
                    .into_inner()
                    .next()
                    .map(|path| QualifiedName::qualify(package, path.as_str()));
            }
            Rule::implements_clause => capabilities.extend(
                part.into_inner()
                    .map(|path| QualifiedName::qualify(package, path.as_str())),
            ),
            Rule::member_decl => members.push(lower_member(part, is_interface)?),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| syntax("unit declaration without a name"))?;
    let mut decl = if is_interface {
        UnitDecl::interface(name)
    } else if is_abstract {
        UnitDecl::abstract_class(name)
    } else {
        UnitDecl::class(name)
    };
    decl.parent = parent;
    decl.capabilities = capabilities;
    decl.members = members;
    Ok(decl)
}

fn lower_member(pair: Pair<'_, Rule>, in_interface: bool) -> Result<Member, PayloadError> {
    let mut kind = None;
    let mut name = None;
    let mut params = Vec::new();
    let mut body = None;

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::member_kind => {
                kind = Some(match part.as_str() {
                    "virtual" => MemberKind::Virtual,
                    "override" => MemberKind::Override,
                    "static" if in_interface => MemberKind::InterfaceStatic,
                    "static" => MemberKind::Static,
                    "default" => MemberKind::Default,
                    _ => MemberKind::Abstract,
                });
            }
            Rule::ident => name = Some(part.as_str()),
            Rule::param_list => {
                for param in part.into_inner() {
                    let spelled: String = param.as_str().split_whitespace().collect();
                    let ty = ParamType::from_source_name(&spelled)
                        .ok_or_else(|| syntax(format!("unknown parameter type `{spelled}`")))?;
                    params.push(ty);
                }
            }
            Rule::body_clause => body = Some(lower_body(part)?),
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| syntax("member without a kind"))?;
    let name = name.ok_or_else(|| syntax("member without a name"))?;
    if let Some(position) = params.iter().position(|p| *p == ParamType::StrVarargs) {
        if position + 1 != params.len() {
            return Err(syntax(format!(
                "`{name}`: a variable-length group must be the last parameter"
            )));
        }
    }
    Ok(Member::new(name, kind, Signature::new(params), body))
}

fn lower_body(pair: Pair<'_, Rule>) -> Result<Body, PayloadError> {
    let mut kind = None;
    let mut text = "";
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::body_kind => kind = Some(part.as_str()),
            Rule::string => {
                text = part.into_inner().next().map_or("", |inner| inner.as_str());
            }
            _ => {}
        }
    }
    match kind {
        Some("transfer") => Ok(Body::Transfer { tag: text.into() }),
        Some("raise") => Ok(Body::Raise {
            message: text.into(),
        }),
        Some("tamper") => Ok(Body::Tamper { tag: text.into() }),
        _ => Err(syntax("member body without a kind")),
    }
}

fn syntax(message: impl Into<String>) -> PayloadError {
    PayloadError::Syntax {
        message: message.into(),
    }
}
