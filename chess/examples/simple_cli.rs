// Simple command-line application to play chess

use heronchess::{Color, GameState, MoveRequest};
use std::io::{self, BufRead, Write};

fn side_name(c: Color) -> &'static str {
    match c {
        Color::White => "White",
        Color::Black => "Black",
    }
}

fn main() {
    let mut stdin = io::stdin().lock();

    let mut state = GameState::new();

    loop {
        let side = state.turn();
        if state.is_checkmate(side) {
            println!("{}", state.board().pretty());
            println!("Checkmate: {} wins", side_name(side.inv()));
            break;
        }
        if state.is_stalemate(side) {
            println!("{}", state.board().pretty());
            println!("Stalemate");
            break;
        }

        println!("{}", state.board().pretty());
        if state.is_in_check(side) {
            println!("{} is in check", side_name(side));
        }
        print!("{} move (e.g. e2e4, e7e8q): ", side_name(side));
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }
        let s = s.trim();

        let req = match s.parse::<MoveRequest>() {
            Ok(req) => req,
            Err(e) => {
                println!("Bad move: {}", e);
                println!();
                continue;
            }
        };

        match state.apply(&req) {
            Ok(next) => state = next,
            Err(e) => {
                println!("Bad move: {}", e);
            }
        }

        println!();
    }

    println!("Moves played:");
    let notation: Vec<_> = state
        .history()
        .iter()
        .map(|r| r.notation().to_string())
        .collect();
    println!("{}", notation.join(" "));
}
