//! Request bodies for integration tests.

use serde_json::{json, Value};

/// Minimal problem body with only a title.
pub fn problem_request(title: &str) -> Value {
    json!({ "title": title })
}

/// Problem body with difficulty and tags set.
pub fn detailed_problem_request(title: &str, difficulty: &str, tags: &[&str]) -> Value {
    json!({
        "title": title,
        "url": format!("https://leetcode.com/problems/{}/", slug(title)),
        "difficulty": difficulty,
        "tags": tags,
        "time_complexity": "O(n)",
    })
}

/// Review submission body.
pub fn review_request(problem_id: i64, result: &str) -> Value {
    json!({ "problem_id": problem_id, "result": result })
}

/// Registration body.
pub fn register_request(name: Option<&str>) -> Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({}),
    }
}

fn slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}
