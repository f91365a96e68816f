use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Next non-whitespace character of the input, `None` at end of input.
fn next_answer(
    input: &mut impl BufRead,
    buffered: &mut VecDeque<char>,
) -> io::Result<Option<char>> {
    loop {
        if let Some(answer) = buffered.pop_front() {
            return Ok(Some(answer));
        }
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        buffered.extend(line.chars().filter(|c| !c.is_whitespace()));
    }
}

/// Ask whether to go ahead with the renames.
///
/// Answers are read one non-whitespace character at a time, and `[Y/N] ` is repeated for
/// every character that is neither `Y` nor `N`. Only the upper-case letters count. End of
/// input counts as N.
pub fn confirm(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    writeln!(
        output,
        "Dry run is not enabled. Are you sure you want to proceed?"
    )?;
    let mut buffered = VecDeque::new();
    loop {
        write!(output, "[Y/N] ")?;
        output.flush()?;

        match next_answer(input, &mut buffered)? {
            Some('Y') => return Ok(true),
            Some('N') => return Ok(false),
            Some(_) => {}
            None => {
                writeln!(output)?;
                return Ok(false);
            }
        }
    }
}
