//! SONiC backend: drives a switch through its Redis control-plane databases.
//!
//! | operation | database | key |
//! |-----------|----------|-----|
//! | device identity | `CONFIG_DB` | `DEVICE_METADATA\|localhost` |
//! | interfaces | `CONFIG_DB` / `STATE_DB` | `PORT\|<name>` / `PORT_TABLE\|<name>` |
//! | ports | `APPL_DB` | `PORT_TABLE:<name>` |
//! | neighbors | `APPL_DB` | `LLDP_ENTRY_TABLE:<name>` |

pub mod db;
pub mod link;
pub mod manifest;
pub mod pool;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use switch_operator_core::{
    code, DeviceStatus, Interface, InterfaceList, InterfaceNeighbor, Port, PortList, Status,
    SwitchDevice, READINESS_READY,
};
use tracing::{debug, info, instrument, warn};

use crate::agent::SwitchAgent;
use crate::config::AgentConfig;
use crate::error::StoreError;
use db::{APPL_DB, CONFIG_DB, STATE_DB};
use link::{LinkResolver, NetlinkLinkResolver};
use pool::ConnectionPool;
use store::{Connector, DbConnection, RedisConnector};

const DEVICE_METADATA_KEY: &str = "DEVICE_METADATA|localhost";
const CONFIG_PORT_PREFIX: &str = "PORT|";
const STATE_PORT_PREFIX: &str = "PORT_TABLE|";
const APPL_PORT_PREFIX: &str = "PORT_TABLE:";
const LLDP_PREFIX: &str = "LLDP_ENTRY_TABLE:";

/// Switch backend over the SONiC control-plane store.
pub struct SonicAgent {
    pool: ConnectionPool,
    links: Arc<dyn LinkResolver>,
    version_file: PathBuf,
    settle_delay: Duration,
}

impl SonicAgent {
    /// Connect to the store at `config.redis_addr`.
    ///
    /// The configuration database is probed once; the probe connection is
    /// not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub async fn connect(config: &AgentConfig) -> Result<Self, StoreError> {
        let agent = Self::with_connector(
            Arc::new(RedisConnector::new(config.redis_addr.clone())),
            Arc::new(NetlinkLinkResolver::new()),
            config,
        );
        agent.pool.probe(CONFIG_DB).await?;
        info!(redis_addr = %config.redis_addr, "Connected to device store");
        Ok(agent)
    }

    /// Build an agent over an arbitrary connector and link resolver.
    #[must_use]
    pub fn with_connector(
        connector: Arc<dyn Connector>,
        links: Arc<dyn LinkResolver>,
        config: &AgentConfig,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(connector),
            links,
            version_file: config.version_file.clone(),
            settle_delay: config.settle_delay,
        }
    }

    async fn db(&self, name: &str) -> Result<Arc<dyn DbConnection>, Status> {
        self.pool.connect(name).await.map_err(|e| {
            warn!(db = name, error = %e, retriable = e.is_retriable(), "Store connection failed");
            Status::bad_request(format!("failed to connect to {name}: {e}"))
        })
    }

    /// Operational and admin status from the state database, both down when unreadable.
    async fn observed_status(
        state_db: &dyn DbConnection,
        name: &str,
    ) -> (DeviceStatus, DeviceStatus) {
        let fields = state_db
            .hgetall(&format!("{STATE_PORT_PREFIX}{name}"))
            .await
            .unwrap_or_else(|e| {
                debug!(interface = name, error = %e, "No state entry, assuming down");
                HashMap::new()
            });
        (
            DeviceStatus::from_store_value(field(&fields, "netdev_oper_status")),
            DeviceStatus::from_store_value(field(&fields, "admin_status")),
        )
    }

    async fn link_mac(&self, name: &str) -> Result<String, Status> {
        match self.links.mac_address(name).await {
            Ok(Some(mac)) => Ok(mac),
            Ok(None) => Err(Status::not_found(format!(
                "no MAC address found for interface {name}"
            ))),
            Err(e) => Err(Status::not_found(format!(
                "failed to get interface {name}: {e}"
            ))),
        }
    }

    async fn read_interface(
        &self,
        state_db: &dyn DbConnection,
        name: &str,
    ) -> Result<Interface, Status> {
        let (operation_status, admin_status) = Self::observed_status(state_db, name).await;
        Ok(Interface {
            name: name.to_string(),
            mac_address: self.link_mac(name).await?,
            operation_status,
            admin_status,
        })
    }

    async fn fill_from_manifest(&self, device: &mut SwitchDevice) {
        if !device.hwsku.is_empty()
            && !device.sonic_os_version.is_empty()
            && !device.asic_type.is_empty()
        {
            return;
        }

        let info = match manifest::read_manifest(&self.version_file).await {
            Ok(info) => info,
            Err(e) => {
                debug!(path = %self.version_file.display(), error = %e, "Version manifest unavailable");
                return;
            }
        };

        for (value, key) in [
            (&mut device.hwsku, "hwsku"),
            (&mut device.sonic_os_version, "sonic_os_version"),
            (&mut device.asic_type, "asic_type"),
        ] {
            if value.is_empty() {
                if let Some(v) = info.get(key) {
                    value.clone_from(v);
                }
            }
        }
    }
}

fn field<'a>(fields: &'a HashMap<String, String>, name: &str) -> &'a str {
    fields.get(name).map_or("", String::as_str)
}

fn require_name(name: &str) -> Result<(), Status> {
    if name.is_empty() {
        Err(Status::bad_request("interface name cannot be empty"))
    } else {
        Ok(())
    }
}

#[async_trait]
impl SwitchAgent for SonicAgent {
    #[instrument(skip(self))]
    async fn get_device_info(&self) -> Result<SwitchDevice, Status> {
        let config_db = self.db(CONFIG_DB).await?;
        let fields = config_db
            .hgetall(DEVICE_METADATA_KEY)
            .await
            .map_err(|e| Status::bad_request(format!("failed to get device info: {e}")))?;

        let Some(mac) = fields.get("mac") else {
            return Err(Status::not_found("missing or invalid MAC address"));
        };

        let mut device = SwitchDevice {
            local_mac_address: mac.clone(),
            hwsku: field(&fields, "hwsku").to_string(),
            sonic_os_version: field(&fields, "sonic_os_version").to_string(),
            asic_type: field(&fields, "asic_type").to_string(),
            readiness: READINESS_READY,
        };
        self.fill_from_manifest(&mut device).await;

        Ok(device)
    }

    #[instrument(skip(self))]
    async fn list_interfaces(&self) -> Result<InterfaceList, Status> {
        let config_db = self.db(CONFIG_DB).await?;
        let state_db = self.db(STATE_DB).await?;

        let mut keys = config_db
            .keys(&format!("{CONFIG_PORT_PREFIX}*"))
            .await
            .map_err(|e| Status::bad_request(format!("failed to obtain iface keys: {e}")))?;
        keys.sort();

        let mut items = Vec::with_capacity(keys.len());
        for key in &keys {
            let name = key
                .strip_prefix(CONFIG_PORT_PREFIX)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    Status::bad_request(format!("failed to parse interface name from key {key}"))
                })?;
            items.push(self.read_interface(state_db.as_ref(), name).await?);
        }

        debug!(count = items.len(), "Listed interfaces");
        Ok(InterfaceList { items })
    }

    #[instrument(skip(self))]
    async fn set_interface_admin_status(
        &self,
        name: &str,
        admin_status: DeviceStatus,
    ) -> Result<Interface, Status> {
        require_name(name)?;
        if admin_status == DeviceStatus::Unknown {
            return Err(Status::bad_request(
                "invalid admin status unknown, it has to be 'up' or 'down'",
            ));
        }

        let config_db = self.db(CONFIG_DB).await?;
        let port_key = format!("{CONFIG_PORT_PREFIX}{name}");

        let fields = config_db.hgetall(&port_key).await.map_err(|e| {
            Status::new(
                code::REDIS_KEY_CHECK_FAIL,
                format!("failed to get current admin status: {e}"),
            )
        })?;
        let previous = field(&fields, "admin_status").to_string();

        config_db
            .hset(&port_key, "admin_status", admin_status.as_str())
            .await
            .map_err(|e| {
                Status::new(
                    code::REDIS_HSET_FAIL,
                    format!("failed to set admin status: {e}"),
                )
            })?;

        let exists = config_db.exists(&port_key).await.map_err(|e| {
            Status::new(
                code::REDIS_KEY_CHECK_FAIL,
                format!("failed to verify interface existence: {e}"),
            )
        })?;
        if !exists {
            return Err(Status::not_found(format!("interface {name} not found")));
        }

        tokio::time::sleep(self.settle_delay).await;

        let state = match self.db(STATE_DB).await {
            Ok(state_db) => state_db
                .hgetall(&format!("{STATE_PORT_PREFIX}{name}"))
                .await
                .map_err(|e| {
                    Status::new(
                        code::REDIS_KEY_CHECK_FAIL,
                        format!("failed to get state info: {e}"),
                    )
                }),
            Err(status) => Err(status),
        };

        let state = match state {
            Ok(state) => state,
            Err(status) => {
                warn!(interface = name, previous = %previous, "State read failed, rolling back admin status");
                if let Err(e) = config_db.hset(&port_key, "admin_status", &previous).await {
                    return Err(Status::new(
                        code::REDIS_HSET_FAIL,
                        format!("failed to rollback admin status: {e}"),
                    ));
                }
                return Err(status);
            }
        };

        info!(interface = name, admin_status = %admin_status, "Set interface admin status");
        Ok(Interface {
            name: name.to_string(),
            mac_address: String::new(),
            operation_status: DeviceStatus::from_store_value(field(&state, "netdev_oper_status")),
            admin_status,
        })
    }

    #[instrument(skip(self))]
    async fn get_interface(&self, name: &str) -> Result<Interface, Status> {
        require_name(name)?;

        let config_db = self.db(CONFIG_DB).await?;
        let state_db = self.db(STATE_DB).await?;

        let exists = config_db
            .exists(&format!("{CONFIG_PORT_PREFIX}{name}"))
            .await
            .map_err(|e| {
                Status::bad_request(format!("failed to check interface existence: {e}"))
            })?;
        if !exists {
            return Err(Status::not_found(format!("interface {name} not found")));
        }

        self.read_interface(state_db.as_ref(), name).await
    }

    #[instrument(skip(self))]
    async fn get_interface_neighbor(&self, name: &str) -> Result<InterfaceNeighbor, Status> {
        require_name(name)?;

        let appl_db = self.db(APPL_DB).await?;
        let lldp_key = format!("{LLDP_PREFIX}{name}");

        let exists = appl_db.exists(&lldp_key).await.map_err(|e| {
            Status::bad_request(format!("failed to check LLDP entry existence: {e}"))
        })?;
        if !exists {
            return Err(Status::not_found(format!(
                "no LLDP neighbor found for interface {name}"
            )));
        }

        let fields = appl_db
            .hgetall(&lldp_key)
            .await
            .map_err(|e| Status::bad_request(format!("failed to get LLDP entry: {e}")))?;

        let mac_address = field(&fields, "lldp_rem_chassis_id");
        let system_name = field(&fields, "lldp_rem_sys_name");
        let handle = match field(&fields, "lldp_rem_port_desc") {
            "" => field(&fields, "lldp_rem_port_id"),
            desc => desc,
        };

        if mac_address.is_empty() || system_name.is_empty() {
            return Err(Status::not_found(format!(
                "incomplete LLDP information for interface {name}"
            )));
        }

        Ok(InterfaceNeighbor {
            name: name.to_string(),
            mac_address: mac_address.to_string(),
            system_name: system_name.to_string(),
            handle: handle.to_string(),
        })
    }

    #[instrument(skip(self))]
    async fn list_ports(&self) -> Result<PortList, Status> {
        let appl_db = self.db(APPL_DB).await?;

        let keys = appl_db
            .keys(&format!("{APPL_PORT_PREFIX}*"))
            .await
            .map_err(|e| Status::bad_request(format!("failed to obtain PORT_TABLE keys: {e}")))?;

        let mut items = Vec::new();
        for key in &keys {
            let Some(name) = key
                .strip_prefix(APPL_PORT_PREFIX)
                .filter(|name| !name.is_empty())
            else {
                continue;
            };

            let fields = match appl_db.hgetall(key).await {
                Ok(fields) => fields,
                Err(e) => {
                    debug!(key = %key, error = %e, "Skipping unreadable port entry");
                    continue;
                }
            };

            if fields.get("parent_port").map(String::as_str) != Some(name) {
                continue;
            }

            let alias = match field(&fields, "alias") {
                "" => name,
                alias => alias,
            };
            items.push(Port {
                name: name.to_string(),
                alias: alias.to_string(),
            });
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(PortList { items })
    }
}

#[cfg(test)]
mod tests {
    use super::link::StaticLinkResolver;
    use super::memory::{MemoryConnector, MemoryStore};
    use super::*;

    fn agent(store: &Arc<MemoryStore>, links: StaticLinkResolver) -> SonicAgent {
        let config = AgentConfig {
            settle_delay: Duration::ZERO,
            version_file: PathBuf::from("/nonexistent/sonic_version.yml"),
            ..AgentConfig::default()
        };
        SonicAgent::with_connector(
            Arc::new(MemoryConnector::new(Arc::clone(store))),
            Arc::new(links),
            &config,
        )
    }

    fn ethernet0_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.insert(CONFIG_DB, "PORT|Ethernet0", &[("admin_status", "down")]);
        store.insert(STATE_DB, "PORT_TABLE|Ethernet0", &[("netdev_oper_status", "down")]);
        store
    }

    fn ethernet0_links() -> StaticLinkResolver {
        StaticLinkResolver::new().with_link("Ethernet0", Some("aa:bb:cc:dd:ee:00"))
    }

    #[tokio::test(start_paused = true)]
    async fn set_admin_status_waits_and_reports_oper_status() {
        let store = ethernet0_store();
        let config = AgentConfig {
            version_file: PathBuf::from("/nonexistent"),
            ..AgentConfig::default()
        };
        let agent = SonicAgent::with_connector(
            Arc::new(MemoryConnector::new(Arc::clone(&store))),
            Arc::new(ethernet0_links()),
            &config,
        );

        let start = tokio::time::Instant::now();
        let iface = agent
            .set_interface_admin_status("Ethernet0", DeviceStatus::Up)
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(iface.name, "Ethernet0");
        assert_eq!(iface.admin_status, DeviceStatus::Up);
        assert_eq!(iface.operation_status, DeviceStatus::Down);
        assert_eq!(
            store.field(CONFIG_DB, "PORT|Ethernet0", "admin_status").as_deref(),
            Some("up")
        );
    }

    #[tokio::test]
    async fn failed_state_read_rolls_back() {
        let store = ethernet0_store();
        store.fail_reads(STATE_DB, "PORT_TABLE|Ethernet0");
        let agent = agent(&store, ethernet0_links());

        let status = agent
            .set_interface_admin_status("Ethernet0", DeviceStatus::Up)
            .await
            .unwrap_err();

        assert_eq!(status.code, code::REDIS_KEY_CHECK_FAIL);
        assert!(status.message.starts_with("failed to get state info"));
        assert_eq!(
            store.field(CONFIG_DB, "PORT|Ethernet0", "admin_status").as_deref(),
            Some("down")
        );
    }

    #[tokio::test]
    async fn failed_rollback_reports_write_failure() {
        let store = ethernet0_store();
        store.fail_reads(STATE_DB, "PORT_TABLE|Ethernet0");
        store.fail_writes_after(1);
        let agent = agent(&store, ethernet0_links());

        let status = agent
            .set_interface_admin_status("Ethernet0", DeviceStatus::Up)
            .await
            .unwrap_err();

        assert_eq!(status.code, code::REDIS_HSET_FAIL);
        assert!(status.message.contains("rollback"));
    }

    #[tokio::test]
    async fn failed_write_reports_hset_code() {
        let store = ethernet0_store();
        store.fail_writes_after(0);
        let agent = agent(&store, ethernet0_links());

        let status = agent
            .set_interface_admin_status("Ethernet0", DeviceStatus::Down)
            .await
            .unwrap_err();
        assert_eq!(status.code, code::REDIS_HSET_FAIL);
    }

    #[tokio::test]
    async fn set_rejects_empty_name_and_unknown_status() {
        let agent = agent(&ethernet0_store(), ethernet0_links());

        let status = agent
            .set_interface_admin_status("", DeviceStatus::Up)
            .await
            .unwrap_err();
        assert_eq!(status.code, code::BAD_REQUEST);

        let status = agent
            .set_interface_admin_status("Ethernet0", DeviceStatus::Unknown)
            .await
            .unwrap_err();
        assert_eq!(status.code, code::BAD_REQUEST);
    }

    #[tokio::test]
    async fn device_info_falls_back_to_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("sonic_version.yml");
        std::fs::write(
            &manifest,
            "---\nhwsku: 'ManifestSku'\nsonic_os_version: 12\nasic_type: \"vs\"\n",
        )
        .unwrap();

        let store = Arc::new(MemoryStore::new());
        store.insert(
            CONFIG_DB,
            DEVICE_METADATA_KEY,
            &[("mac", "aa:bb:cc:00:00:01"), ("hwsku", "StoreSku")],
        );
        let config = AgentConfig {
            version_file: manifest,
            ..AgentConfig::default()
        };
        let agent = SonicAgent::with_connector(
            Arc::new(MemoryConnector::new(Arc::clone(&store))),
            Arc::new(StaticLinkResolver::new()),
            &config,
        );

        let device = agent.get_device_info().await.unwrap();
        assert_eq!(device.local_mac_address, "aa:bb:cc:00:00:01");
        assert_eq!(device.hwsku, "StoreSku");
        assert_eq!(device.sonic_os_version, "12");
        assert_eq!(device.asic_type, "vs");
        assert_eq!(device.readiness, READINESS_READY);
    }

    #[tokio::test]
    async fn device_info_requires_mac() {
        let store = Arc::new(MemoryStore::new());
        store.insert(CONFIG_DB, DEVICE_METADATA_KEY, &[("hwsku", "X")]);
        let agent = agent(&store, StaticLinkResolver::new());

        let status = agent.get_device_info().await.unwrap_err();
        assert!(status.is_not_found());
    }

    #[tokio::test]
    async fn device_info_accepts_empty_mac_field() {
        let store = Arc::new(MemoryStore::new());
        store.insert(CONFIG_DB, DEVICE_METADATA_KEY, &[("mac", ""), ("hwsku", "X")]);
        let agent = agent(&store, StaticLinkResolver::new());

        let device = agent.get_device_info().await.unwrap();
        assert_eq!(device.local_mac_address, "");
        assert_eq!(device.hwsku, "X");
    }

    #[tokio::test]
    async fn unreachable_store_is_bad_request() {
        let store = Arc::new(MemoryStore::new());
        store.set_reachable(false);
        let agent = agent(&store, StaticLinkResolver::new());

        assert_eq!(agent.get_device_info().await.unwrap_err().code, code::BAD_REQUEST);
        assert_eq!(agent.list_ports().await.unwrap_err().code, code::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_interfaces_reads_state_and_links() {
        let store = ethernet0_store();
        store.insert(CONFIG_DB, "PORT|Ethernet4", &[("admin_status", "up")]);
        store.insert(
            STATE_DB,
            "PORT_TABLE|Ethernet4",
            &[("netdev_oper_status", "up"), ("admin_status", "up")],
        );
        let links = ethernet0_links().with_link("Ethernet4", Some("aa:bb:cc:dd:ee:04"));
        let agent = agent(&store, links);

        let list = agent.list_interfaces().await.unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].name, "Ethernet0");
        assert_eq!(list.items[0].operation_status, DeviceStatus::Down);
        assert_eq!(list.items[0].admin_status, DeviceStatus::Down);
        assert_eq!(list.items[1].name, "Ethernet4");
        assert_eq!(list.items[1].mac_address, "aa:bb:cc:dd:ee:04");
        assert_eq!(list.items[1].operation_status, DeviceStatus::Up);
        assert_eq!(list.items[1].admin_status, DeviceStatus::Up);
    }

    #[tokio::test]
    async fn list_interfaces_fails_when_any_mac_is_missing() {
        let store = ethernet0_store();
        store.insert(CONFIG_DB, "PORT|Ethernet4", &[("admin_status", "up")]);
        let links = ethernet0_links().with_link("Ethernet4", None);
        let agent = agent(&store, links);

        let status = agent.list_interfaces().await.unwrap_err();
        assert!(status.is_not_found());
    }

    #[tokio::test]
    async fn get_interface_checks_existence() {
        let agent = agent(&ethernet0_store(), ethernet0_links());

        let iface = agent.get_interface("Ethernet0").await.unwrap();
        assert_eq!(iface.mac_address, "aa:bb:cc:dd:ee:00");

        assert!(agent.get_interface("Ethernet8").await.unwrap_err().is_not_found());
        assert_eq!(
            agent.get_interface("").await.unwrap_err().code,
            code::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn set_then_get_reflects_up() {
        let store = ethernet0_store();
        let agent = agent(&store, ethernet0_links());

        agent
            .set_interface_admin_status("Ethernet0", DeviceStatus::Up)
            .await
            .unwrap();
        // The state database follows the configuration database on a real device.
        store.insert(STATE_DB, "PORT_TABLE|Ethernet0", &[("admin_status", "up")]);

        let iface = agent.get_interface("Ethernet0").await.unwrap();
        assert_eq!(iface.admin_status, DeviceStatus::Up);
    }

    #[tokio::test]
    async fn neighbor_requires_complete_entry() {
        let store = Arc::new(MemoryStore::new());
        store.insert(
            APPL_DB,
            "LLDP_ENTRY_TABLE:Ethernet0",
            &[
                ("lldp_rem_chassis_id", "11:22:33:44:55:66"),
                ("lldp_rem_sys_name", "spine-1"),
                ("lldp_rem_port_id", "Eth5(Port5)"),
                ("lldp_rem_port_desc", "Ethernet16"),
            ],
        );
        store.insert(
            APPL_DB,
            "LLDP_ENTRY_TABLE:Ethernet4",
            &[("lldp_rem_chassis_id", "11:22:33:44:55:66")],
        );
        store.insert(
            APPL_DB,
            "LLDP_ENTRY_TABLE:Ethernet8",
            &[
                ("lldp_rem_chassis_id", "11:22:33:44:55:77"),
                ("lldp_rem_sys_name", "spine-2"),
                ("lldp_rem_port_id", "Eth9"),
            ],
        );
        let agent = agent(&store, StaticLinkResolver::new());

        let neighbor = agent.get_interface_neighbor("Ethernet0").await.unwrap();
        assert_eq!(neighbor.name, "Ethernet0");
        assert_eq!(neighbor.system_name, "spine-1");
        assert_eq!(neighbor.handle, "Ethernet16");

        let fallback = agent.get_interface_neighbor("Ethernet8").await.unwrap();
        assert_eq!(fallback.handle, "Eth9");

        assert!(agent
            .get_interface_neighbor("Ethernet4")
            .await
            .unwrap_err()
            .is_not_found());
        assert!(agent
            .get_interface_neighbor("Ethernet12")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn ports_keep_only_physical_entries() {
        let store = Arc::new(MemoryStore::new());
        store.insert(
            APPL_DB,
            "PORT_TABLE:Ethernet0",
            &[("parent_port", "Ethernet0"), ("alias", "etp1")],
        );
        store.insert(APPL_DB, "PORT_TABLE:Ethernet4", &[("parent_port", "Ethernet4")]);
        store.insert(
            APPL_DB,
            "PORT_TABLE:Ethernet0.10",
            &[("parent_port", "Ethernet0"), ("alias", "etp1.10")],
        );
        store.insert(APPL_DB, "PORT_TABLE:Ethernet8", &[("alias", "etp3")]);
        store.insert(APPL_DB, "PORT_TABLE:Ethernet12", &[("parent_port", "Ethernet12")]);
        store.fail_reads(APPL_DB, "PORT_TABLE:Ethernet12");
        let agent = agent(&store, StaticLinkResolver::new());

        let ports = agent.list_ports().await.unwrap();
        assert_eq!(
            ports.items,
            vec![
                Port {
                    name: "Ethernet0".into(),
                    alias: "etp1".into()
                },
                Port {
                    name: "Ethernet4".into(),
                    alias: "Ethernet4".into()
                },
            ]
        );
    }
}
