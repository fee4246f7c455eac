use crate::output::print_json;

use super::RunOptions;

const EXAMPLE: &str = "craig query \"Who needs to complete security training?\"";

/// Questions are accepted but not answered: the compliance source exposes no
/// query surface.
pub fn run(text: Option<&str>, opts: RunOptions) -> anyhow::Result<()> {
    let question = match text.map(str::trim) {
        Some(q) if !q.is_empty() => q,
        _ => anyhow::bail!("please provide a question, e.g. {EXAMPLE}"),
    };
    tracing::debug!(question, "query received");

    if opts.json {
        return print_json(&serde_json::json!({
            "question": question,
            "supported": false,
        }));
    }

    println!("Question: {question}");
    println!("Natural-language queries are not supported yet.");
    println!("Use 'craig daily-check --dry-run' to see who is outstanding.");
    Ok(())
}
