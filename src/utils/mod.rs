use crate::errors::CommandError;

pub type CommandResult<T = ()> = std::result::Result<T, CommandError>;

/// Chat names arrive lowercased from the transport, announcements capitalize them.
pub fn display_name(user: &str) -> String {
    let mut chars = user.chars();

    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Everything after `prefix`, if `text` starts with it ignoring ASCII case.
pub fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;

    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
