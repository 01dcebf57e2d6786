use super::common::NO_DESCRIPTION;
use crate::Result;
use crate::digest::Digest;
use crate::search::RepositoryResult;
use core::fmt::Write;

/// Most use cases shown per repository
pub const MAX_USE_CASES: usize = 3;

/// Most setup steps shown per repository
pub const MAX_SETUP_STEPS: usize = 4;

const USE_CASE_SEPARATOR: &str = " ・";

/// Render chat text listing name, stars, description, and URL of each repository
pub fn generate_plain<W: Write>(items: &[RepositoryResult], top: usize, title: &str, writer: &mut W) -> Result<()> {
    write_header(title, writer)?;

    for (index, item) in items.iter().take(top).enumerate() {
        let description = item.description_text();
        let description = if description.is_empty() { NO_DESCRIPTION } else { description };

        writeln!(writer, "{}. {} ★{}", index + 1, item.full_name, item.stargazers_count)?;
        writeln!(writer, "   {description}")?;
        writeln!(writer, "   {}", item.html_url)?;
        writeln!(writer)?;
    }

    Ok(())
}

/// Render chat text pairing each repository with its digest.
///
/// Repositories without a matching digest are not rendered.
pub fn generate_with_digests<W: Write>(
    items: &[RepositoryResult],
    digests: &[Digest],
    top: usize,
    title: &str,
    writer: &mut W,
) -> Result<()> {
    write_header(title, writer)?;

    for (index, (item, digest)) in items.iter().zip(digests).take(top).enumerate() {
        let use_cases = if digest.use_cases().is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            digest.use_cases().iter().take(MAX_USE_CASES).map(String::as_str).collect::<Vec<_>>().join(USE_CASE_SEPARATOR)
        };

        writeln!(writer, "{}. {} ★{}", index + 1, item.full_name, item.stargazers_count)?;
        writeln!(writer, "   {}", item.html_url)?;
        writeln!(writer, "   {}", digest.summary())?;
        writeln!(writer, "   🧠 {} / 難易度★{}", digest.why_care(), digest.difficulty())?;
        writeln!(writer, "   使いどころ: {use_cases}")?;
        for step in digest.setup().iter().take(MAX_SETUP_STEPS) {
            writeln!(writer, "   - {step}")?;
        }
        writeln!(writer, "   {}", item.description_text())?;
        writeln!(writer)?;
    }

    Ok(())
}

fn write_header<W: Write>(title: &str, writer: &mut W) -> Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(writer)?;
    Ok(())
}
