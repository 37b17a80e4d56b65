//! Start command for starting a timer.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use anyhow::Result;

use punch_core::{StoreEvent, TimerName};
use punch_db::Store;

/// Starts the timer, reporting what the store published: the implicit stop
/// of a previously running timer comes through the bus just like the start
/// itself.
pub fn run<W: Write>(writer: &mut W, store: &mut Store, title: &str) -> Result<()> {
    let title = TimerName::new(title)?;

    let events: Rc<RefCell<Vec<StoreEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let subscription = {
        let events = Rc::clone(&events);
        store
            .bus_mut()
            .subscribe(move |event| events.borrow_mut().push(event.clone()))
    };
    let result = store.start_timer(&title);
    store.bus_mut().unsubscribe(subscription);
    result?;

    for event in events.borrow().iter() {
        match event {
            StoreEvent::TimerStopped { timer } => writeln!(writer, "Stopped '{timer}'")?,
            StoreEvent::TimerStarted { timer } => writeln!(writer, "Started '{timer}'")?,
            StoreEvent::Init | StoreEvent::TimerCreated { .. } => {}
        }
    }
    Ok(())
}
