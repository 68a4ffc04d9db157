//! Prints the hardware topology available to the current process, together with the
//! diagnostics emitted while discovering it.

use hw_topology::hardware_topology;
use tracing::Level;

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let topology = hardware_topology();
    let machine = topology.machine();

    println!(
        "{} threads on {} cores in {} packages and {} NUMA nodes",
        machine.max_threads(),
        machine.max_cores(),
        machine.max_sockets(),
        machine.max_numa_nodes()
    );

    for package_rank in 0..machine.max_sockets() {
        println!("Package rank {package_rank}:");

        for thread in topology.threads_in_package(package_rank) {
            let kind = if thread.is_smt_sibling() {
                "SMT sibling"
            } else {
                "primary"
            };

            println!(
                "    {thread}: package {} core {} NUMA node {} ({kind})",
                thread.package_id(),
                thread.core_id(),
                thread.numa_node()
            );
        }
    }
}
