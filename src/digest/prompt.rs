use super::repo_digest::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::search::RepositoryResult;
use serde::Serialize;
use serde_json::json;

const SYSTEM_PROMPT: &str = "あなたは実務経験の豊富なMLエンジニア兼テクニカルエディターです。回答はJSONオブジェクトのみで返してください。";

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message in a chat-completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Build the system and user messages asking for a digest of `repo`
#[must_use]
pub fn digest_messages(repo: &RepositoryResult) -> [ChatMessage; 2] {
    [
        ChatMessage {
            role: Role::System,
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: Role::User,
            content: user_prompt(repo),
        },
    ]
}

fn user_prompt(repo: &RepositoryResult) -> String {
    format!(
        "エンジニアが「今日これを試すかどうか」を判断できるよう、次のGitHubリポジトリを最小限の情報に要約してください。

入力:
- name: {name}
- url: {url}
- description: {description}
- meta:
  Language: {language}
  Stars: {stars}

要件:
- summary: 技術的な要点を2〜3文で
- why_care: 今使う価値を一言で
- use_cases: 具体的な用途を名詞句で最大3つ
- setup: 最短の導入手順を2〜4行
- difficulty: {MIN_DIFFICULTY}〜{MAX_DIFFICULTY}の整数 ({MIN_DIFFICULTY}=とても簡単)

{format}",
        name = repo.full_name,
        url = repo.html_url,
        description = repo.description_text(),
        language = repo.language_text(),
        stars = repo.stargazers_count,
        format = format_instructions(),
    )
}

/// Describe the expected JSON shape to the model
fn format_instructions() -> String {
    let schema = json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string", "description": "技術の要点 (2〜3文)" },
            "why_care": { "type": "string", "description": "今使う価値 (一言)" },
            "use_cases": { "type": "array", "items": { "type": "string" }, "maxItems": 3, "description": "具体的な用途" },
            "setup": { "type": "array", "items": { "type": "string" }, "maxItems": 4, "description": "最短の導入手順" },
            "difficulty": { "type": "integer", "minimum": MIN_DIFFICULTY, "maximum": MAX_DIFFICULTY, "description": "導入の難しさ" }
        },
        "required": ["summary", "why_care", "use_cases", "setup", "difficulty"]
    });

    format!("出力は次のJSON Schemaに適合するJSONオブジェクトにしてください。スキーマ自体は出力しないでください。\n```\n{schema}\n```")
}
