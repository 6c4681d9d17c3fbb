//! Driver tests against a real Redis server.
//!
//! Run with: cargo test -p switch-agent --test redis_store_test -- --ignored

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use switch_agent::sonic::db::{db_index, APPL_DB, CONFIG_DB, STATE_DB};
use switch_agent::sonic::link::LinkResolver;
use switch_agent::sonic::store::{Connector, DbConnection, RedisConnector};
use switch_agent::{AgentConfig, SonicAgent, SwitchAgent};
use switch_operator_core::{code, DeviceStatus};
use testcontainers::{
    core::{ContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage,
};

struct RedisEnv {
    _container: ContainerAsync<GenericImage>,
    addr: String,
}

impl RedisEnv {
    async fn start() -> Self {
        let container = GenericImage::new("redis", "7-alpine")
            .with_exposed_port(ContainerPort::Tcp(6379))
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await
            .expect("start redis container");
        let host = container.get_host().await.expect("container host");
        let port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("container port");

        Self {
            _container: container,
            addr: format!("{host}:{port}"),
        }
    }

    async fn db(&self, name: &str) -> MultiplexedConnection {
        let client = redis::Client::open(format!("redis://{}/{}", self.addr, db_index(name)))
            .expect("redis url");
        client
            .get_multiplexed_async_connection()
            .await
            .expect("redis connection")
    }

    async fn seed(&self, db: &str, key: &str, fields: &[(&str, &str)]) {
        let mut conn = self.db(db).await;
        let _: () = conn.hset_multiple(key, fields).await.expect("HSET");
    }

    async fn hgetall(&self, db: &str, key: &str) -> HashMap<String, String> {
        let mut conn = self.db(db).await;
        conn.hgetall(key).await.expect("HGETALL")
    }

    fn agent(&self) -> SonicAgent {
        let config = AgentConfig {
            settle_delay: Duration::from_millis(10),
            version_file: "/nonexistent/sonic_version.yml".into(),
            ..AgentConfig::default()
        };
        SonicAgent::with_connector(
            Arc::new(RedisConnector::new(self.addr.clone())),
            Arc::new(Links),
            &config,
        )
    }
}

struct Links;

#[async_trait]
impl LinkResolver for Links {
    async fn mac_address(&self, name: &str) -> std::io::Result<Option<String>> {
        match name {
            "Ethernet0" => Ok(Some("aa:bb:cc:dd:ee:00".to_string())),
            "Ethernet4" => Ok(Some("aa:bb:cc:dd:ee:04".to_string())),
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("link {name} not found"),
            )),
        }
    }
}

async fn seed_ethernet0(env: &RedisEnv) {
    env.seed(CONFIG_DB, "PORT|Ethernet0", &[("admin_status", "down"), ("mtu", "9100")])
        .await;
    env.seed(
        STATE_DB,
        "PORT_TABLE|Ethernet0",
        &[("admin_status", "down"), ("netdev_oper_status", "up")],
    )
    .await;
}

#[tokio::test]
#[ignore] // Requires Docker
async fn connector_selects_logical_database() {
    let env = RedisEnv::start().await;
    env.seed(CONFIG_DB, "PORT|Ethernet0", &[("admin_status", "up")])
        .await;

    let connector = RedisConnector::new(env.addr.clone());
    let config_db = connector
        .connect(CONFIG_DB, db_index(CONFIG_DB))
        .await
        .unwrap();
    let appl_db = connector.connect(APPL_DB, db_index(APPL_DB)).await.unwrap();

    config_db.ping().await.unwrap();
    assert!(config_db.exists("PORT|Ethernet0").await.unwrap());
    assert!(!appl_db.exists("PORT|Ethernet0").await.unwrap());
    assert_eq!(
        config_db.keys("PORT|*").await.unwrap(),
        vec!["PORT|Ethernet0".to_string()]
    );
    assert!(appl_db.keys("PORT|*").await.unwrap().is_empty());
    assert!(config_db.hgetall("PORT|Ethernet4").await.unwrap().is_empty());

    appl_db.hset("PORT_TABLE:Ethernet0", "alias", "etp1").await.unwrap();
    assert_eq!(
        env.hgetall(APPL_DB, "PORT_TABLE:Ethernet0").await["alias"],
        "etp1"
    );
}

#[tokio::test]
#[ignore] // Requires Docker
async fn set_admin_status_writes_config_db_only() {
    let env = RedisEnv::start().await;
    seed_ethernet0(&env).await;
    let agent = env.agent();

    let iface = agent
        .set_interface_admin_status("Ethernet0", DeviceStatus::Up)
        .await
        .unwrap();
    assert_eq!(iface.admin_status, DeviceStatus::Up);
    assert_eq!(iface.operation_status, DeviceStatus::Up);

    let config = env.hgetall(CONFIG_DB, "PORT|Ethernet0").await;
    assert_eq!(config["admin_status"], "up");
    assert_eq!(config["mtu"], "9100");

    let state = env.hgetall(STATE_DB, "PORT_TABLE|Ethernet0").await;
    assert_eq!(state["admin_status"], "down");

    for db in [APPL_DB, STATE_DB] {
        let mut conn = env.db(db).await;
        let exists: bool = conn.exists("PORT|Ethernet0").await.unwrap();
        assert!(!exists, "PORT|Ethernet0 leaked into {db}");
    }
}

#[tokio::test]
#[ignore] // Requires Docker
async fn driver_reads_store_layout() {
    let env = RedisEnv::start().await;
    seed_ethernet0(&env).await;
    env.seed(CONFIG_DB, "PORT|Ethernet4", &[("admin_status", "down")])
        .await;
    env.seed(
        CONFIG_DB,
        "DEVICE_METADATA|localhost",
        &[
            ("mac", "68:21:5f:47:0d:6e"),
            ("hwsku", "Accton-AS7726-32X"),
            ("sonic_os_version", "202311"),
            ("asic_type", "broadcom"),
        ],
    )
    .await;
    env.seed(
        APPL_DB,
        "PORT_TABLE:Ethernet0",
        &[("alias", "etp1"), ("parent_port", "Ethernet0")],
    )
    .await;
    env.seed(
        APPL_DB,
        "LLDP_ENTRY_TABLE:Ethernet0",
        &[
            ("lldp_rem_chassis_id", "aa:bb:cc:00:00:09"),
            ("lldp_rem_sys_name", "spine-1"),
            ("lldp_rem_port_id", "Ethernet120"),
        ],
    )
    .await;
    let agent = env.agent();

    let device = agent.get_device_info().await.unwrap();
    assert_eq!(device.local_mac_address, "68:21:5f:47:0d:6e");
    assert_eq!(device.hwsku, "Accton-AS7726-32X");

    let list = agent.list_interfaces().await.unwrap();
    let names: Vec<_> = list.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Ethernet0", "Ethernet4"]);
    assert_eq!(list.items[0].operation_status, DeviceStatus::Up);
    assert_eq!(list.items[1].operation_status, DeviceStatus::Down);

    let iface = agent.get_interface("Ethernet0").await.unwrap();
    assert_eq!(iface.mac_address, "aa:bb:cc:dd:ee:00");
    assert_eq!(iface.admin_status, DeviceStatus::Down);

    let neighbor = agent.get_interface_neighbor("Ethernet0").await.unwrap();
    assert_eq!(neighbor.system_name, "spine-1");
    assert_eq!(neighbor.handle, "Ethernet120");
    let missing = agent.get_interface_neighbor("Ethernet4").await.unwrap_err();
    assert_eq!(missing.code, code::NOT_FOUND);

    let ports = agent.list_ports().await.unwrap();
    assert_eq!(ports.items.len(), 1);
    assert_eq!(ports.items[0].alias, "etp1");
}
