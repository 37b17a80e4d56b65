//! Create command for adding a timer.

use std::io::Write;

use anyhow::Result;

use punch_core::TimerName;
use punch_db::Store;

pub fn run<W: Write>(writer: &mut W, store: &mut Store, title: &str) -> Result<()> {
    let title = TimerName::new(title)?;
    store.create_timer(&title)?;
    writeln!(writer, "Created timer '{title}'")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_reports_the_new_timer() {
        let mut store = Store::open_in_memory().unwrap();
        let mut output = Vec::new();

        run(&mut output, &mut store, "Writing").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output, "Created timer 'Writing'\n");
        assert_eq!(store.all_timers().unwrap().len(), 1);
    }

    #[test]
    fn create_rejects_an_empty_title() {
        let mut store = Store::open_in_memory().unwrap();
        let mut output = Vec::new();

        let result = run(&mut output, &mut store, "");
        assert!(result.is_err());
        assert!(store.all_timers().unwrap().is_empty());
    }

    #[test]
    fn recreating_a_timer_does_not_duplicate_it() {
        let mut store = Store::open_in_memory().unwrap();
        let mut output = Vec::new();

        run(&mut output, &mut store, "Writing").unwrap();
        run(&mut output, &mut store, "Writing").unwrap();

        assert_eq!(store.all_timers().unwrap().len(), 1);
    }
}
