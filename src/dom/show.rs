use std::borrow::Cow;

/// How a response body is turned into container content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Injected as received.
    #[default]
    Verbatim,
    /// Markup removed, text kept.
    PlainText,
}

pub fn show(body: &str, mode: RenderMode) -> Cow<str> {
    match mode {
        RenderMode::Verbatim => Cow::Borrowed(body),
        RenderMode::PlainText => Cow::Owned(show_without_tag(body)),
    }
}

fn show_without_tag(body: &str) -> String {
    let mut is_angle = 0;
    let mut body_without_tag = String::with_capacity(body.len());
    for c in body.chars() {
        if c == '<' {
            is_angle += 1;
        } else if c == '>' {
            if is_angle > 0 {
                is_angle -= 1;
            }
        } else if is_angle == 0 {
            body_without_tag.push(c);
        }
    }
    body_without_tag
}
