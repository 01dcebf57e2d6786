use super::common::{NO_DESCRIPTION, flatten_description, format_timestamp};
use crate::Result;
use crate::search::RepositoryResult;
use chrono::{DateTime, Local};
use core::fmt::Write;

/// Render a Markdown report: title, generation time, then one section per repository.
///
/// Sections are separated by a blank line and the document ends with a single newline.
pub fn generate<W: Write>(
    items: &[RepositoryResult],
    top: usize,
    title: &str,
    generated_at: DateTime<Local>,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "# {title}")?;
    writeln!(writer)?;
    writeln!(writer, "実行日時: {}", generated_at.format("%Y-%m-%dT%H:%M:%S"))?;

    for (index, item) in items.iter().take(top).enumerate() {
        let description = flatten_description(item.description_text());
        let description = if description.is_empty() { NO_DESCRIPTION } else { description.as_str() };

        writeln!(writer)?;
        writeln!(
            writer,
            "## {}. [{}]({})  ★{}",
            index + 1,
            item.full_name,
            item.html_url,
            item.stargazers_count
        )?;
        writeln!(writer, "- 言語: `{}`", item.language_text())?;
        writeln!(
            writer,
            "- created: `{}` / pushed: `{}`",
            format_timestamp(&item.created_at),
            format_timestamp(&item.pushed_at)
        )?;
        writeln!(writer, "- 概要: {description}")?;
    }

    Ok(())
}
