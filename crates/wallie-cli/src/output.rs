use serde::Serialize;
use wallie_core::backlog::Story;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// `[ABC-12      ] Title (XL)`
pub fn story_line(story: &Story) -> String {
    format!("[{:<12}] {} ({})", story.id, story.title, story.size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallie_core::size::Size;

    #[test]
    fn story_line_pads_key() {
        let story = Story {
            id: "ABC-1".into(),
            title: "Create service skeleton".into(),
            description: String::new(),
            author: String::new(),
            size: Size::ExtraLarge,
        };
        assert_eq!(
            story_line(&story),
            "[ABC-1       ] Create service skeleton (XL)"
        );
    }
}
