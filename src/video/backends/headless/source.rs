//! A small GLSL front-end for the headless backend.
//!
//! It does not type-check expressions. It checks the source structure: the
//! `#version` directive, balanced delimiters, statement terminators and the
//! global `uniform`/`in`/`out` declarations. That is enough to reject broken
//! sources and to resolve uniform names the same way a driver would.

use crate::video::assets::shader::{UniformVariable, UniformVariableType};

/// What a successfully compiled stage exposes to the linker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageInfo {
    pub uniforms: Vec<UniformDecl>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub has_main: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniformDecl {
    pub name: String,
    pub glsl_type: String,
    /// `None` for arrays and for types the frontend has no variable for.
    pub tp: Option<UniformVariableType>,
    /// Value of a literal initializer, `uniform float mix = 0.2;`.
    pub init: Option<UniformVariable>,
}

const TYPES: &[&str] = &[
    "void", "bool", "int", "uint", "float", "double", "vec2", "vec3", "vec4", "ivec2", "ivec3",
    "ivec4", "uvec2", "uvec3", "uvec4", "bvec2", "bvec3", "bvec4", "mat2", "mat3", "mat4",
    "sampler2D", "sampler3D", "samplerCube", "sampler2DArray", "sampler2DShadow",
];

const QUALIFIERS: &[&str] = &[
    "flat", "smooth", "noperspective", "centroid", "invariant", "highp", "mediump", "lowp",
];

const KEYWORDS: &[&str] = &[
    "uniform", "in", "out", "inout", "const", "layout", "struct", "return", "if", "else", "for",
    "while", "do", "break", "continue", "discard", "true", "false", "precision",
];

fn error(line: usize, msg: &str) -> String {
    format!("0:{}(0): error: {}", line, msg)
}

/// Compiles a single stage. The error is the info log a driver would report.
pub fn compile(src: &str) -> Result<StageInfo, String> {
    let src = strip_comments(src)?;

    if src.trim().is_empty() {
        return Err(error(1, "empty shader source"));
    }

    check_version(&src)?;
    check_balance(&src)?;

    let src = strip_directives(&src);
    check_terminators(&src)?;
    declarations(&src)
}

/// Links two compiled stages, returning the program's uniform table.
pub fn link(vs: &StageInfo, fs: &StageInfo) -> Result<Vec<UniformDecl>, String> {
    if !vs.has_main {
        return Err("error: vertex shader lacks `main'".into());
    }

    if !fs.has_main {
        return Err("error: fragment shader lacks `main'".into());
    }

    for input in &fs.inputs {
        if !vs.outputs.contains(input) {
            return Err(format!(
                "error: fragment shader input `{}' has no matching output in the previous stage",
                input
            ));
        }
    }

    let mut uniforms: Vec<UniformDecl> = Vec::new();
    for v in vs.uniforms.iter().chain(fs.uniforms.iter()) {
        match uniforms.iter().find(|u| u.name == v.name) {
            Some(u) if u.glsl_type != v.glsl_type => {
                return Err(format!(
                    "error: uniform `{}' declared as type `{}' and as type `{}'",
                    v.name, u.glsl_type, v.glsl_type
                ));
            }
            Some(_) => {}
            None => uniforms.push(v.clone()),
        }
    }

    Ok(uniforms)
}

/// Replaces comments with blanks, keeping line breaks so line numbers survive.
fn strip_comments(src: &str) -> Result<String, String> {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some('/')) => {
                while let Some(&n) = chars.peek() {
                    if n == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                let start = line;
                chars.next();

                let mut closed = false;
                let mut last = ' ';
                for n in chars.by_ref() {
                    if n == '\n' {
                        line += 1;
                        out.push('\n');
                    }

                    if last == '*' && n == '/' {
                        closed = true;
                        break;
                    }

                    last = n;
                }

                if !closed {
                    return Err(error(start, "unterminated comment"));
                }

                out.push(' ');
            }
            _ => {
                if c == '\n' {
                    line += 1;
                }
                out.push(c);
            }
        }
    }

    Ok(out)
}

fn check_version(src: &str) -> Result<(), String> {
    let (line, text) = src
        .lines()
        .enumerate()
        .find(|(_, v)| !v.trim().is_empty())
        .map(|(i, v)| (i + 1, v.trim()))
        .unwrap_or((1, ""));

    if !text.starts_with("#version") {
        return Err(error(line, "#version directive required"));
    }

    match text.split_whitespace().nth(1).map(|v| v.parse::<u32>()) {
        Some(Ok(_)) => Ok(()),
        _ => Err(error(line, "invalid #version directive")),
    }
}

fn check_balance(src: &str) -> Result<(), String> {
    let mut stack = Vec::new();
    let mut line = 1;

    for c in src.chars() {
        match c {
            '\n' => line += 1,
            '(' | '{' | '[' => stack.push((c, line)),
            ')' | '}' | ']' => {
                let open = match c {
                    ')' => '(',
                    '}' => '{',
                    _ => '[',
                };

                match stack.pop() {
                    Some((v, _)) if v == open => {}
                    _ => return Err(error(line, &format!("syntax error, unexpected '{}'", c))),
                }
            }
            _ => {}
        }
    }

    match stack.pop() {
        Some((c, line)) => Err(error(
            line,
            &format!("syntax error, unexpected end of file, unclosed '{}'", c),
        )),
        None => Ok(()),
    }
}

fn strip_directives(src: &str) -> String {
    src.lines()
        .map(|v| if v.trim_start().starts_with('#') { "" } else { v })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every block must close after a complete statement.
fn check_terminators(src: &str) -> Result<(), String> {
    let mut line = 1;
    let mut last = '{';

    for c in src.chars() {
        if c == '\n' {
            line += 1;
        }

        if c == '}' && !";{}".contains(last) {
            return Err(error(line, "syntax error, unexpected '}', expecting ';'"));
        }

        if !c.is_whitespace() {
            last = c;
        }
    }

    Ok(())
}

fn declarations(src: &str) -> Result<StageInfo, String> {
    let mut info = StageInfo::default();
    let mut depth = 0;
    let mut stmt = String::new();
    let mut line = 1;
    let mut stmt_line = 1;

    for c in src.chars() {
        if c == '\n' {
            line += 1;
        }

        match c {
            '{' => {
                if depth == 0 {
                    block_header(&stmt, stmt_line)?;
                    if is_main(&stmt) {
                        info.has_main = true;
                    }
                    stmt.clear();
                }
                depth += 1;
            }
            '}' => depth -= 1,
            ';' if depth == 0 => {
                if !stmt.trim().is_empty() {
                    declaration(&mut info, &stmt, stmt_line)?;
                }
                stmt.clear();
            }
            _ if depth == 0 => {
                if stmt.trim().is_empty() && !c.is_whitespace() {
                    stmt_line = line;
                }
                stmt.push(c);
            }
            _ => {}
        }
    }

    if !stmt.trim().is_empty() {
        return Err(error(stmt_line, "syntax error, unexpected end of file"));
    }

    Ok(info)
}

fn tokenize(stmt: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(stmt.len() * 2);
    for c in stmt.chars() {
        if "()[],=".contains(c) {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }

    spaced.split_whitespace().map(|v| v.to_owned()).collect()
}

/// A block at global scope opens a function body, a struct or an interface block.
fn block_header(header: &str, line: usize) -> Result<(), String> {
    let tokens = tokenize(header);
    let mut tokens = &tokens[..];
    if tokens.first().map(|v| v.as_str()) == Some("layout") {
        if let Some(end) = tokens.iter().position(|v| v == ")") {
            tokens = &tokens[end + 1..];
        }
    }

    let valid = match tokens.first().map(|v| v.as_str()) {
        Some("struct") | Some("uniform") => tokens.len() == 2 && is_identifier(&tokens[1]),
        Some(v) if TYPES.contains(&v) => {
            tokens.len() >= 4
                && is_identifier(&tokens[1])
                && tokens[2] == "("
                && tokens.last().map(|v| v.as_str()) == Some(")")
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(error(line, "syntax error, unexpected '{'"))
    }
}

fn is_main(header: &str) -> bool {
    let tokens = tokenize(header);
    tokens.len() >= 3 && tokens[0] == "void" && tokens[1] == "main" && tokens[2] == "("
}

fn is_identifier(v: &str) -> bool {
    let mut chars = v.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&v)
        && !TYPES.contains(&v)
}

fn declaration(info: &mut StageInfo, stmt: &str, line: usize) -> Result<(), String> {
    let tokens = tokenize(stmt);
    let mut tokens = &tokens[..];

    if tokens.first().map(|v| v.as_str()) == Some("layout") {
        match tokens.iter().position(|v| v == ")") {
            Some(end) => tokens = &tokens[end + 1..],
            None => return Err(error(line, "syntax error, malformed layout qualifier")),
        }
    }

    while let Some(v) = tokens.first() {
        if QUALIFIERS.contains(&v.as_str()) {
            tokens = &tokens[1..];
        } else {
            break;
        }
    }

    let storage = match tokens.first() {
        Some(v) => v.as_str(),
        None => return Err(error(line, "syntax error, unexpected ';'")),
    };

    if storage != "uniform" && storage != "in" && storage != "out" {
        return Ok(());
    }

    let mut rest = &tokens[1..];
    while let Some(v) = rest.first() {
        if QUALIFIERS.contains(&v.as_str()) {
            rest = &rest[1..];
        } else {
            break;
        }
    }

    let glsl_type = match rest.first() {
        Some(v) => v.as_str(),
        None => return Err(error(line, "syntax error, unexpected ';'")),
    };

    if !TYPES.contains(&glsl_type) || glsl_type == "void" {
        return Err(error(line, &format!("syntax error, unknown type `{}'", glsl_type)));
    }

    if rest.len() == 1 {
        return Err(error(
            line,
            &format!("syntax error, unexpected ';', expecting identifier after `{}'", glsl_type),
        ));
    }

    for declarator in declarators(&rest[1..]) {
        let name = match declarator.first() {
            Some(v) => v.as_str(),
            None => return Err(error(line, "syntax error, unexpected `,'")),
        };

        if !is_identifier(name) {
            return Err(error(
                line,
                &format!("syntax error, unexpected `{}', expecting identifier", name),
            ));
        }

        let (is_array, init) = match declarator.get(1).map(|v| v.as_str()) {
            None => (false, None),
            Some("[") => (true, None),
            Some("=") if storage == "uniform" && declarator.len() > 2 => {
                (false, initializer(glsl_type, &declarator[2..]))
            }
            Some(v) => return Err(error(line, &format!("syntax error, unexpected `{}'", v))),
        };

        match storage {
            "uniform" => {
                let tp = if is_array {
                    None
                } else {
                    uniform_type(glsl_type)
                };

                info.uniforms.push(UniformDecl {
                    name: name.to_owned(),
                    glsl_type: glsl_type.to_owned(),
                    tp,
                    init,
                });
            }
            "in" => info.inputs.push(name.to_owned()),
            _ => info.outputs.push(name.to_owned()),
        }
    }

    Ok(())
}

/// Splits `a, b[2], c = f(x, y)` into its declarators on top-level commas.
fn declarators(tokens: &[String]) -> Vec<&[String]> {
    let mut out = Vec::new();
    let mut depth = 0;
    let mut start = 0;

    for (i, v) in tokens.iter().enumerate() {
        match v.as_str() {
            "(" | "[" => depth += 1,
            ")" | "]" => depth -= 1,
            "," if depth == 0 => {
                out.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    out.push(&tokens[start..]);
    out
}

/// Evaluates a single literal initializer. Anything more involved is left to the
/// default value.
fn initializer(glsl_type: &str, tokens: &[String]) -> Option<UniformVariable> {
    if tokens.len() != 1 {
        return None;
    }

    let literal = tokens[0].as_str();
    match glsl_type {
        "bool" => match literal {
            "true" => Some(UniformVariable::Bool(true)),
            "false" => Some(UniformVariable::Bool(false)),
            _ => None,
        },
        "int" => literal.parse().ok().map(UniformVariable::I32),
        "float" => literal
            .trim_end_matches(|c| c == 'f' || c == 'F')
            .parse()
            .ok()
            .map(UniformVariable::F32),
        _ => None,
    }
}

fn uniform_type(glsl_type: &str) -> Option<UniformVariableType> {
    match glsl_type {
        "mat4" => Some(UniformVariableType::Matrix4f),
        "bool" => Some(UniformVariableType::Bool),
        "float" => Some(UniformVariableType::F32),
        "int" => Some(UniformVariableType::I32),
        v if v.starts_with("sampler") => Some(UniformVariableType::I32),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const VS: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;

out vec3 ourColor;
uniform mat4 transform;

void main() {
    gl_Position = transform * vec4(aPos, 1.0);
    ourColor = aColor;
}
";

    const FS: &str = "#version 330 core
out vec4 FragColor;
in vec3 ourColor;
/* sampled
   textures */
uniform sampler2D texture1; // unit 0
uniform float mixValue = 0.2;

void main() {
    FragColor = vec4(ourColor, mixValue);
}
";

    #[test]
    fn declarations() {
        let vs = compile(VS).unwrap();
        assert!(vs.has_main);
        assert_eq!(vs.inputs, vec!["aPos", "aColor"]);
        assert_eq!(vs.outputs, vec!["ourColor"]);
        assert_eq!(vs.uniforms.len(), 1);
        assert_eq!(vs.uniforms[0].name, "transform");
        assert_eq!(vs.uniforms[0].tp, Some(UniformVariableType::Matrix4f));

        let fs = compile(FS).unwrap();
        assert_eq!(fs.inputs, vec!["ourColor"]);
        let names: Vec<_> = fs.uniforms.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["texture1", "mixValue"]);
        assert_eq!(fs.uniforms[0].tp, Some(UniformVariableType::I32));

        let uniforms = link(&vs, &fs).unwrap();
        assert_eq!(uniforms.len(), 3);
    }

    #[test]
    fn declarator_lists() {
        let src = "#version 330 core
uniform sampler2D texture1, texture2;
uniform float weights[4], scale = 2.5f, bias;
uniform vec3 tint = vec3(1.0, 0.5, 0.2), shade;
in vec2 uv, st;
void main() {}
";

        let info = compile(src).unwrap();
        let names: Vec<_> = info.uniforms.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["texture1", "texture2", "weights", "scale", "bias", "tint", "shade"]
        );
        assert_eq!(info.uniforms[1].tp, Some(UniformVariableType::I32));
        assert_eq!(info.uniforms[2].tp, None);
        assert_eq!(info.uniforms[3].init, Some(UniformVariable::F32(2.5)));
        assert_eq!(info.uniforms[4].init, None);
        assert_eq!(info.uniforms[5].init, None);
        assert_eq!(info.inputs, vec!["uv", "st"]);

        assert!(compile("#version 330 core\nuniform int a, ;\nvoid main() {}").is_err());
        assert!(compile("#version 330 core\nuniform int a, 2;\nvoid main() {}").is_err());
        assert!(compile("#version 330 core\nin vec3 p = 1.0;\nvoid main() {}").is_err());
    }

    #[test]
    fn literal_initializers() {
        let src = "#version 330 core
uniform float mixValue = 0.2;
uniform int unit = 1;
uniform bool enabled = true;
uniform mat4 transform = mat4(1.0);
void main() {}
";

        let info = compile(src).unwrap();
        let inits: Vec<_> = info.uniforms.iter().map(|v| v.init).collect();
        assert_eq!(
            inits,
            vec![
                Some(UniformVariable::F32(0.2)),
                Some(UniformVariable::I32(1)),
                Some(UniformVariable::Bool(true)),
                None,
            ]
        );
    }

    #[test]
    fn compact_source() {
        let src = "#version 330 core\nlayout(location=0) in vec3 p; void main(){gl_Position=vec4(p,1);}";
        let info = compile(src).unwrap();
        assert!(info.has_main);
        assert_eq!(info.inputs, vec!["p"]);
    }

    #[test]
    fn syntax_errors() {
        assert!(compile("").unwrap_err().contains("empty"));
        assert!(compile("void main() {}").unwrap_err().contains("#version"));
        assert!(compile("#version core\nvoid main() {}").is_err());
        assert!(compile("#version 330 core\nvoid main() {").is_err());
        assert!(compile("#version 330 core\nvoid main() { x = 1 }").is_err());
        assert!(compile("#version 330 core\nuniform mat4 transform\nvoid main() {}").is_err());
        assert!(compile("#version 330 core\nuniform mat5 transform;").is_err());
        assert!(compile("#version 330 core\nuniform mat4 in;").is_err());
        assert!(compile("#version 330 core\n/* open").is_err());
        assert!(compile("#version 330 core\nmain() {}").is_err());
        assert!(compile("#version 330 core\nstruct Light { vec3 p; };\nvoid main() {}").is_ok());

        let err = compile("#version 330 core\n\nvoid main() { gl_Position = vec4(1.0) }").unwrap_err();
        assert!(err.starts_with("0:3(0)"));
    }

    #[test]
    fn link_errors() {
        let vs = compile("#version 330 core\nvoid main() {}").unwrap();
        let fs = compile("#version 330 core\nin vec3 color;\nvoid main() {}").unwrap();
        assert!(link(&vs, &fs).unwrap_err().contains("color"));

        let nomain = compile("#version 330 core\nout vec4 c;").unwrap();
        assert!(link(&vs, &nomain).unwrap_err().contains("lacks `main'"));

        let a = compile("#version 330 core\nuniform int v;\nvoid main() {}").unwrap();
        let b = compile("#version 330 core\nuniform float v;\nvoid main() {}").unwrap();
        assert!(link(&a, &b).is_err());
    }
}
