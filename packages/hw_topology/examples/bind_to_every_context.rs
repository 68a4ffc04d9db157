//! Spawns one thread per usable hardware thread and binds each to its hardware context.

use std::thread;

use hw_topology::{AffinityBinder, bind_current_thread, hardware_topology};

fn main() {
    tracing_subscriber::fmt::init();

    let topology = hardware_topology();

    thread::scope(|s| {
        for thread in topology.threads() {
            s.spawn(move || {
                if !bind_current_thread(thread.os_context()) {
                    println!("Could not bind {thread}");
                    return;
                }

                let affinity = AffinityBinder::current().current_thread_os_contexts();
                println!("Bound {thread}, affinity is now {affinity:?}");

                // In a real service, this is where the worker loop for this hardware thread
                // would start.
            });
        }
    });

    println!("All threads have finished.");
}
