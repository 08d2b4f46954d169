//! Interactive client for the parlor service.
//!
//! Connects, presents the connection signature, then loops a menu:
//! build a request from prompted input, frame it, and render the reply.

use clap::Parser;
use parlor::frame;
use serde_json::{json, Value};
use tokio::net::TcpStream;

/// Command-line arguments for the client
#[derive(Parser, Debug)]
#[command(name = "parlor-client")]
#[command(about = "Interactive client for the parlor service", long_about = None)]
struct ClientArgs {
    /// Server address to connect to
    #[arg(default_value = "127.0.0.1:8888")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ClientArgs::parse();

    let mut stream = TcpStream::connect(&args.addr).await?;
    frame::write_magic(&mut stream).await?;
    println!("Connected to {}", args.addr);

    loop {
        println!(
            "What would you like to do: 1 - echo, 2 - add, 3 - addmany, \
             4 - string concatenation, 5 - quiz game (0 to quit)"
        );
        let choice = read_line()?;

        let request = match choice.trim() {
            "0" => {
                println!("Goodbye!");
                return Ok(());
            }
            "1" => {
                let message = prompt("Which string do you want to send?")?;
                json!({ "type": "echo", "data": message })
            }
            "2" => {
                let num1 = prompt("Enter first number:")?;
                let num2 = prompt("Enter second number:")?;
                json!({ "type": "add", "num1": num1, "num2": num2 })
            }
            "3" => {
                println!("Enter one number per line, 0 to finish:");
                let nums = collect_nums(read_line)?;
                json!({ "type": "addmany", "nums": nums })
            }
            "4" => {
                let string1 = prompt("Enter first string:")?;
                let string2 = prompt("Enter second string:")?;
                json!({ "type": "stringconcatenation", "string1": string1, "string2": string2 })
            }
            "5" => match quiz_request()? {
                Some(request) => request,
                None => continue,
            },
            _ => {
                println!("Invalid option.");
                continue;
            }
        };

        frame::write_request(&mut stream, &request.to_string()).await?;

        match frame::read_reply(&mut stream).await? {
            Some(reply) => render(&reply),
            None => {
                println!("Server closed the connection.");
                return Ok(());
            }
        }
    }
}

/// Build a quiz request from the sub-menu, or None on a bad option
fn quiz_request() -> Result<Option<Value>, std::io::Error> {
    println!("Quiz game. Choose an option:");
    println!("1: Add a new question");
    println!("2: Request a new question");
    println!("3: Answer the current question");
    let choice = read_line()?;

    let request = match choice.trim() {
        "1" => {
            let question = prompt("Enter the new question:")?;
            let answer = prompt("Enter the answer for the new question:")?;
            json!({ "type": "quizgame", "addQuestion": true, "question": question, "answer": answer })
        }
        "2" => json!({ "type": "quizgame", "addQuestion": false }),
        "3" => {
            let answer = prompt("Enter your answer:")?;
            json!({ "type": "quizgame", "answer": answer })
        }
        _ => {
            println!("Invalid quiz option.");
            return Ok(None);
        }
    };

    Ok(Some(request))
}

/// Collect addmany entries one per line; the terminating "0" stays in
/// the list
fn collect_nums<F>(mut next_line: F) -> Result<Vec<String>, std::io::Error>
where
    F: FnMut() -> Result<String, std::io::Error>,
{
    let mut nums = Vec::new();
    loop {
        let num = next_line()?;
        let done = num == "0";
        nums.push(num);
        if done {
            return Ok(nums);
        }
    }
}

/// Print the raw reply, then a friendlier line per response type
fn render(raw: &str) {
    let reply: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => {
            println!("Unparseable response: {}", raw);
            return;
        }
    };

    println!("Got response: {}", reply);

    if reply["ok"].as_bool() != Some(true) {
        println!("{}", reply["message"].as_str().unwrap_or("Request failed."));
        return;
    }

    match reply["type"].as_str() {
        Some("echo") => {
            println!("{}", reply["echo"].as_str().unwrap_or_default());
        }
        Some("add") | Some("addmany") => {
            println!("{}", reply["result"]);
        }
        Some("stringconcatenation") => {
            println!("{}", reply["result"].as_str().unwrap_or_default());
        }
        Some("quizgame") => {
            if let Some(question) = reply["question"].as_str() {
                println!("Question: {}", question);
            } else if let Some(correct) = reply["result"].as_bool() {
                println!("Your answer is {}", if correct { "correct" } else { "incorrect" });
            } else {
                println!("Question saved.");
            }
        }
        Some(other) => println!("Unrecognized response type: {}", other),
        None => {}
    }
}

fn prompt(label: &str) -> Result<String, std::io::Error> {
    println!("{}", label);
    read_line()
}

fn read_line() -> Result<String, std::io::Error> {
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_nums_keeps_the_terminator() {
        let mut lines = ["12", "15", "0"].into_iter();
        let nums = collect_nums(|| Ok(lines.next().unwrap().to_string())).unwrap();
        assert_eq!(nums, ["12", "15", "0"]);
    }

    #[test]
    fn test_collect_nums_first_line_can_terminate() {
        let mut lines = ["0"].into_iter();
        let nums = collect_nums(|| Ok(lines.next().unwrap().to_string())).unwrap();
        assert_eq!(nums, ["0"]);
    }
}
