use std::process::{Command, Output};

fn sanity_maze(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sanity-maze"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch sanity-maze")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

#[test]
fn generate_json_is_reproducible_for_a_seed() {
    let first = stdout_of(&sanity_maze(&[
        "generate", "--level", "2", "--seed", "11", "--format", "json",
    ]));
    let second = stdout_of(&sanity_maze(&[
        "generate", "--level", "2", "--seed", "11", "--format", "json",
    ]));
    assert_eq!(first, second);

    let report: serde_json::Value = serde_json::from_str(&first).expect("valid json");
    assert_eq!(report["level"], 2);
    assert_eq!(report["seed"], 11);
    assert_eq!(report["strategy"], "growing-tree");
    assert_eq!(report["width"], 110);
    assert_eq!(report["rows"].as_array().map(Vec::len), Some(110));
    assert!(report["exit_distance"].is_u64());
}

#[test]
fn generate_ascii_marks_spawn() {
    let text = stdout_of(&sanity_maze(&["generate", "--seed", "4"]));

    assert!(text.starts_with("level 1 (recursive-backtrack) 105x105 seed 4"));
    assert_eq!(text.matches('@').count(), 1);
    assert!(text.contains('E'));
}

#[test]
fn level_zero_is_rejected() {
    let output = sanity_maze(&["generate", "--level", "0", "--seed", "1"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to generate level 0"), "stderr: {stderr}");
}

#[test]
fn simulate_reports_events_as_json() {
    let text = stdout_of(&sanity_maze(&[
        "simulate", "--frames", "120", "--seed", "5", "--format", "json",
    ]));

    let report: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(report["frames"], 120);
    assert_eq!(report["phase"], "playing");
    assert_eq!(report["events"][0]["kind"], "level-started");
    assert_eq!(report["stats"]["attempts"], 1);
}

#[test]
fn simulate_can_draw_the_view() {
    let text = stdout_of(&sanity_maze(&[
        "simulate",
        "--frames",
        "30",
        "--seed",
        "5",
        "--render-every",
        "10",
    ]));

    assert_eq!(text.matches("level 1 | sanity").count(), 3);
    assert!(text.contains("ran 30 frames"));
}

#[test]
fn drawing_the_view_does_not_change_the_run() {
    let config = std::env::temp_dir()
        .join(format!("sanity-maze-replay-{}.toml", std::process::id()));
    std::fs::write(&config, "[maze]\nbase_width = 15\nbase_height = 13\n")
        .expect("config is writable");
    let config = config.to_str().expect("temp path is utf-8").to_owned();

    let mut args = vec![
        "simulate", "--config", &config, "--seed", "1", "--frames", "1500", "--format", "json",
    ];
    let plain = stdout_of(&sanity_maze(&args));
    args.extend(["--render-every", "1"]);
    let drawn = stdout_of(&sanity_maze(&args));

    let report_of = |text: &str| -> serde_json::Value {
        let start = text.find('{').expect("report follows the frames");
        serde_json::from_str(&text[start..]).expect("valid json")
    };
    let plain = report_of(&plain);
    assert!(plain["stats"]["levels_completed"].as_u64() > Some(0));
    assert!(drawn.contains("| sanity"));
    assert_eq!(plain, report_of(&drawn));
}
