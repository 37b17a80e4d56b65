//! Stop command for recording a stop mark.

use std::io::Write;

use anyhow::Result;

use punch_core::TimerName;
use punch_db::Store;

pub fn run<W: Write>(writer: &mut W, store: &mut Store, title: &str) -> Result<()> {
    let title = TimerName::new(title)?;
    store.stop_timer(&title)?;
    writeln!(writer, "Stopped '{title}'")?;
    Ok(())
}
