use assert_cmd::Command;
use predicates::prelude::*;

fn game_reviews(db: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("game-reviews").unwrap();
    cmd.arg("--database").arg(db).env("GAME_REVIEWS_LOG", "off");
    cmd
}

#[test]
fn seeded_game_shows_its_reviews_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("game_reviews.db");

    game_reviews(&db).args(["migrate", "up"]).assert().success();
    game_reviews(&db).arg("seed").assert().success();

    game_reviews(&db)
        .args(["games", "show", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reviews\""))
        .stdout(predicate::str::contains("Breath of the Wild"));
}

#[test]
fn unknown_review_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("game_reviews.db");

    game_reviews(&db).args(["migrate", "up"]).assert().success();
    game_reviews(&db)
        .args(["reviews", "show", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("评论 5 不存在"));
}

#[test]
fn status_lists_both_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("game_reviews.db");

    game_reviews(&db)
        .args(["migrate", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pending  m20240301_000001_create_games"))
        .stdout(predicate::str::contains("pending  m20240301_000002_create_reviews"));
}
