use crate::Result;
use crate::search::RepositoryResult;
use core::fmt::Write;
use owo_colors::OwoColorize;

/// One line per displayed repository: position, name, stars, and URL
pub fn generate<W: Write>(items: &[RepositoryResult], top: usize, use_colors: bool, writer: &mut W) -> Result<()> {
    for (index, item) in items.iter().take(top).enumerate() {
        let stars = format!("★{}", item.stargazers_count);
        if use_colors {
            writeln!(
                writer,
                "{}. {}  {}  {}",
                index + 1,
                item.full_name.bold(),
                stars.yellow(),
                item.html_url.cyan()
            )?;
        } else {
            writeln!(writer, "{}. {}  {stars}  {}", index + 1, item.full_name, item.html_url)?;
        }
    }

    Ok(())
}
