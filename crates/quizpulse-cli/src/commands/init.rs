//! The `quizpulse init` command.

use std::path::Path;

use anyhow::Result;

const FILES: [(&str, &str); 4] = [
    ("quizpulse.toml", SAMPLE_CONFIG),
    ("data/quiz.json", SAMPLE_QUIZ),
    ("data/submission.json", SAMPLE_SUBMISSION),
    ("data/history.json", SAMPLE_HISTORY),
];

pub fn execute() -> Result<()> {
    std::fs::create_dir_all("data")?;

    for (path, content) in FILES {
        if Path::new(path).exists() {
            println!("{path} already exists, skipping.");
        } else {
            std::fs::write(path, content)?;
            println!("Created {path}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Replace the files in data/ with your own payloads, or point [source] at your API");
    println!("  2. Run: quizpulse validate");
    println!("  3. Run: quizpulse analyze --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizpulse configuration

output_dir = "./quizpulse-results"

[source]
type = "files"
quiz_path = "data/quiz.json"
submission_path = "data/submission.json"
history_path = "data/history.json"

# To fetch over HTTP instead:
# [source]
# type = "http"
# quiz_url = "${QUIZ_API}/quiz"
# submission_url = "${QUIZ_API}/submission"
# history_url = "${QUIZ_API}/history"
# timeout_secs = 30

[rules]
weak_ratio = 0.5
strong_ratio = 0.8
trend_window = 5
low_mean_threshold = 50.0
"#;

const SAMPLE_QUIZ: &str = r#"{
  "quiz": {
    "correct_answer_marks": 4,
    "negative_marks": 1,
    "questions": [
      {
        "id": 101,
        "topic": "cell biology",
        "difficulty_level": "easy",
        "options": [
          {"id": 1, "is_correct": true},
          {"id": 2, "is_correct": false}
        ]
      },
      {
        "id": 102,
        "topic": "cell biology",
        "difficulty_level": "easy",
        "options": [
          {"id": 3, "is_correct": false},
          {"id": 4, "is_correct": true}
        ]
      },
      {
        "id": 103,
        "topic": "genetics",
        "difficulty_level": "medium",
        "options": [
          {"id": 5, "is_correct": true},
          {"id": 6, "is_correct": false}
        ]
      },
      {
        "id": 104,
        "topic": "genetics",
        "difficulty_level": "medium",
        "options": [
          {"id": 7, "is_correct": false},
          {"id": 8, "is_correct": true}
        ]
      }
    ]
  }
}
"#;

const SAMPLE_SUBMISSION: &str = r#"{
  "response_map": {
    "101": 1,
    "102": 4,
    "103": 6
  }
}
"#;

const SAMPLE_HISTORY: &str = r#"[
  {"score": "62%", "accuracy": "70%"},
  {"score": "68%", "accuracy": "72%"},
  {"score": "71%", "accuracy": "75%"},
  {"score": "75%", "accuracy": "78%"},
  {"score": "80%", "accuracy": "81%"}
]
"#;
