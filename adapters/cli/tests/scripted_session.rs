use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rail-defence"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("failed to launch rail-defence")
}

#[test]
fn scripted_track_is_built_and_ridden() {
    let output = run(&["--place", "0,0;1,0;1,1", "--steer", "E,N"]);
    assert!(output.status.success(), "session should complete");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Welcome to Rail Defence."));
    assert!(stdout.contains("MoverArrived { cell: CellCoord { column: 1, row: 1 } }"));

    let grid: Vec<&str> = stdout
        .lines()
        .skip_while(|line| line.len() != 7 || line.contains(' '))
        .take(7)
        .collect();
    assert_eq!(grid[5], ".M.....", "mover rests on (1, 1)");
    assert_eq!(grid[6], "##.....", "base row holds the first two cells");
    assert!(stdout.contains("balance: 7"));
}

#[test]
fn disconnected_track_skips_action_phase() {
    let output = run(&["--place", "0,0;1,0;2,0;1,0", "--steer", "E"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("ActionPhaseStarted"));
    assert!(stdout.contains("balance: 8"));
}

#[test]
fn malformed_cells_are_rejected_by_the_parser() {
    let output = run(&["--place", "0;0"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("column,row"));
}
