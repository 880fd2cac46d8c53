//! Host facts gathered through `sysinfo`.
//!
//! The tree mirrors the layout hierarchy documents already query:
//!
//! ```text
//! memory.virtual.{total, available, used, free, usedPercent}
//! memory.swap.info.{total, used, free, usedPercent}
//! memory.swap.devices[]
//! cpu.info[].{cpu, name, vendorId, modelName, mhz}
//! partition.partitions[].{device, mountpoint, fstype, removable}
//! partition.usage[].{path, fstype, total, free, used, usedPercent}
//! host.info.{hostname, os, platform, platformVersion, kernelVersion,
//!            kernelArch, uptime, bootTime, procs}
//! network.interfaces[].{name, hardwareAddr, bytesRecv, bytesSent}
//! ```
//!
//! Values the platform cannot report are left empty rather than failing the
//! whole gathering.

use serde_json::{Value, json};
use sysinfo::{Disk, Disks, Networks, System};
use tiny_hiera::Mapping;

/// Facts describing the host, grouped by subsystem.
#[must_use]
pub fn system_facts() -> Mapping {
    let system = System::new_all();
    let disks = Disks::new_with_refreshed_list();
    let networks = Networks::new_with_refreshed_list();

    let mut facts = Mapping::new();
    facts.insert("memory".to_owned(), memory(&system));
    facts.insert("cpu".to_owned(), json!({"info": cpu_info(&system)}));
    facts.insert("partition".to_owned(), partitions(&disks));
    facts.insert("host".to_owned(), json!({"info": host_info(&system)}));
    facts.insert(
        "network".to_owned(),
        json!({"interfaces": interfaces(&networks)}),
    );
    tracing::debug!(
        cpus = system.cpus().len(),
        disks = disks.list().len(),
        "gathered system facts"
    );
    facts
}

fn memory(system: &System) -> Value {
    let total = system.total_memory();
    let used = system.used_memory();
    let swap_total = system.total_swap();
    let swap_used = system.used_swap();
    json!({
        "virtual": {
            "total": total,
            "available": system.available_memory(),
            "used": used,
            "free": system.free_memory(),
            "usedPercent": percent(used, total),
        },
        "swap": {
            "info": {
                "total": swap_total,
                "used": swap_used,
                "free": system.free_swap(),
                "usedPercent": percent(swap_used, swap_total),
            },
            "devices": [],
        },
    })
}

fn cpu_info(system: &System) -> Vec<Value> {
    system
        .cpus()
        .iter()
        .enumerate()
        .map(|(index, cpu)| {
            json!({
                "cpu": index,
                "name": cpu.name(),
                "vendorId": cpu.vendor_id(),
                "modelName": cpu.brand(),
                "mhz": cpu.frequency(),
            })
        })
        .collect()
}

fn partitions(disks: &Disks) -> Value {
    let (described, usage): (Vec<Value>, Vec<Value>) =
        disks.list().iter().map(|disk| (partition(disk), disk_usage(disk))).unzip();
    json!({"partitions": described, "usage": usage})
}

fn partition(disk: &Disk) -> Value {
    json!({
        "device": disk.name().to_string_lossy(),
        "mountpoint": disk.mount_point().to_string_lossy(),
        "fstype": disk.file_system().to_string_lossy(),
        "removable": disk.is_removable(),
    })
}

fn disk_usage(disk: &Disk) -> Value {
    let total = disk.total_space();
    let free = disk.available_space();
    let used = total.saturating_sub(free);
    json!({
        "path": disk.mount_point().to_string_lossy(),
        "fstype": disk.file_system().to_string_lossy(),
        "total": total,
        "free": free,
        "used": used,
        "usedPercent": percent(used, total),
    })
}

fn host_info(system: &System) -> Value {
    json!({
        "hostname": System::host_name().unwrap_or_default(),
        "os": std::env::consts::OS,
        "platform": System::distribution_id(),
        "platformVersion": System::os_version().unwrap_or_default(),
        "kernelVersion": System::kernel_version().unwrap_or_default(),
        "kernelArch": std::env::consts::ARCH,
        "uptime": System::uptime(),
        "bootTime": System::boot_time(),
        "procs": system.processes().len(),
    })
}

fn interfaces(networks: &Networks) -> Vec<Value> {
    let mut described: Vec<(String, Value)> = networks
        .into_iter()
        .map(|(name, data)| {
            let entry = json!({
                "name": name,
                "hardwareAddr": data.mac_address().to_string(),
                "bytesRecv": data.total_received(),
                "bytesSent": data.total_transmitted(),
            });
            (name.clone(), entry)
        })
        .collect();
    described.sort_by(|(left, _), (right, _)| left.cmp(right));
    described.into_iter().map(|(_, entry)| entry).collect()
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "percentages are reported as floats like the other usage figures"
)]
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}
