//! MCP out-of-band line encoding

/// Out-of-band lines start with this escape prefix
pub const OOB_PREFIX: &str = "#$#";

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c == ' ' || c == '"' || c == '\\' || c == ':')
}

/// Encode one value per MCP simple-value rules: bare when it is a plain
/// token, otherwise quoted with backslash escapes for `"` and `\`.
pub fn encode_value(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// One out-of-band message: a name plus ordered key/value fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpMessage {
    name: String,
    fields: Vec<(String, String)>,
}

impl McpMessage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Render the message as a single line. Every message after the
    /// opening `mcp` announcement carries the session auth key between
    /// the name and the first field.
    pub fn encode(&self, auth_key: Option<&str>) -> String {
        let mut line = format!("{}{}", OOB_PREFIX, self.name);
        if let Some(key) = auth_key {
            line.push(' ');
            line.push_str(key);
        }
        for (key, value) in &self.fields {
            line.push(' ');
            line.push_str(key);
            line.push_str(": ");
            line.push_str(&encode_value(value));
        }
        line
    }
}
