//! Output rendering.
//!
//! `basic` prints one `<kind>/<name>` line per object. `table` prints
//! aligned columns with an upper-case header row.

use std::io::{self, Write};

use clap::ValueEnum;
use switch_operator_core::{
    Interface, InterfaceList, InterfaceNeighbor, List, Object, PortList, Status, SwitchDevice,
};

const COLUMN_GAP: &str = "   ";

/// Output format selected with `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Aligned columns.
    #[default]
    Table,
    /// One `<kind>/<name>` line per object.
    Basic,
}

/// Something that can be shown as table rows.
pub trait Tabular {
    /// Column headers.
    fn headers(&self) -> &'static [&'static str];
    /// One row per object.
    fn rows(&self) -> Vec<Vec<String>>;
}

const DEVICE_HEADERS: &[&str] = &[
    "Name",
    "MAC Address",
    "HW SKU",
    "Sonic OS Version",
    "ASIC Type",
    "Readiness",
];
const INTERFACE_HEADERS: &[&str] = &["Name", "MAC Address", "Operation Status", "Admin Status"];
const NEIGHBOR_HEADERS: &[&str] = &["Neighbor Name", "Handle", "MAC Address"];
const PORT_HEADERS: &[&str] = &["Name", "Alias"];

impl Tabular for SwitchDevice {
    fn headers(&self) -> &'static [&'static str] {
        DEVICE_HEADERS
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.name(),
            self.local_mac_address.clone(),
            self.hwsku.clone(),
            self.sonic_os_version.clone(),
            self.asic_type.clone(),
            self.readiness.to_string(),
        ]]
    }
}

fn interface_row(iface: &Interface) -> Vec<String> {
    vec![
        iface.name.clone(),
        iface.mac_address.clone(),
        iface.operation_status.to_string(),
        iface.admin_status.to_string(),
    ]
}

impl Tabular for Interface {
    fn headers(&self) -> &'static [&'static str] {
        INTERFACE_HEADERS
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![interface_row(self)]
    }
}

impl Tabular for InterfaceList {
    fn headers(&self) -> &'static [&'static str] {
        INTERFACE_HEADERS
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.items.iter().map(interface_row).collect()
    }
}

impl Tabular for InterfaceNeighbor {
    fn headers(&self) -> &'static [&'static str] {
        NEIGHBOR_HEADERS
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.system_name.clone(),
            self.handle.clone(),
            self.mac_address.clone(),
        ]]
    }
}

impl Tabular for PortList {
    fn headers(&self) -> &'static [&'static str] {
        PORT_HEADERS
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.items
            .iter()
            .map(|port| vec![port.name.clone(), port.alias.clone()])
            .collect()
    }
}

/// Render a single object.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_object<W, T>(w: &mut W, format: OutputFormat, info: &str, object: &T) -> io::Result<()>
where
    W: Write,
    T: Object + Tabular,
{
    write_info(w, info)?;
    match format {
        OutputFormat::Basic => write_basic(w, &[object as &dyn Object]),
        OutputFormat::Table => write_table(w, object.headers(), &object.rows()),
    }
}

/// Render a list of objects.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_list<W, T>(w: &mut W, format: OutputFormat, info: &str, list: &T) -> io::Result<()>
where
    W: Write,
    T: List + Tabular,
{
    write_info(w, info)?;
    match format {
        OutputFormat::Basic => write_basic(w, &list.objects()),
        OutputFormat::Table => write_table(w, list.headers(), &list.rows()),
    }
}

/// Render the header printed for a nonzero agent status.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_server_error<W: Write>(w: &mut W, status: &Status) -> io::Result<()> {
    writeln!(w, "server error: {}, {}", status.code, status.message)
}

fn write_info<W: Write>(w: &mut W, info: &str) -> io::Result<()> {
    if info.is_empty() {
        Ok(())
    } else {
        writeln!(w, "{info}")
    }
}

fn write_basic<W: Write>(w: &mut W, objects: &[&dyn Object]) -> io::Result<()> {
    for object in objects {
        writeln!(w, "{}/{}", object.kind().to_lowercase(), object.name())?;
    }
    Ok(())
}

fn write_table<W: Write>(w: &mut W, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let headers: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    for row in std::iter::once(&headers).chain(rows) {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        writeln!(w, "{}", line.trim_end())?;
    }
    Ok(())
}
