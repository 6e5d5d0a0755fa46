use anyhow::Result;

use opsdesk_core::render::render_message_html;

pub fn run(text: Option<String>) -> Result<()> {
    let input = match text {
        Some(text) => text,
        None => std::io::read_to_string(std::io::stdin())?,
    };

    println!("{}", render_message_html(input.trim_end_matches('\n')));
    Ok(())
}
