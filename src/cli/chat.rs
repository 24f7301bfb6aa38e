use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::view::{Conversation, HttpTransport, Names, Transport, Viewport, entries, render_lines};

// Clear the screen and move the cursor home
const CLEAR: &str = "\x1B[2J\x1B[H";

fn draw<T: Transport>(conversation: &mut Conversation<T>, names: &Names) {
    let lines = render_lines(&entries(conversation), names);
    print!("{}", CLEAR);
    for line in conversation.viewport_mut().visible(&lines) {
        println!("{}", line);
    }
}

pub async fn run(
    url: &str,
    token: Option<&str>,
    height: usize,
    assistant_name: &str,
) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let transport = HttpTransport::new(url, token);
    let session = transport.session().await?;
    let names = Names::new(
        session.as_ref().and_then(|s| s.user.name.as_deref()),
        assistant_name,
    );

    match &session {
        Some(_) => println!("Welcome, {}! Ask me anything!", names.user),
        None => println!("Welcome, Guest! Please log in to start chatting."),
    }

    let mut conversation = Conversation::new(transport, Viewport::new(height));

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                conversation.set_input(&line);
                let Some(request) = conversation.begin_submit() else {
                    continue;
                };
                rl.add_history_entry(line.as_str())?;
                // Show the loading placeholder while waiting
                draw(&mut conversation, &names);
                let result = conversation.transport().send(&request).await;
                conversation.finish_submit(result);
                draw(&mut conversation, &names);
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
