// @generated by yaml-classgen. Do not edit by hand.

fn yaml_bool(v: &serde_yaml::Value) -> Option<bool> {
    v.as_bool()
}

fn yaml_i64(v: &serde_yaml::Value) -> Option<i64> {
    v.as_i64()
}

fn yaml_f64(v: &serde_yaml::Value) -> Option<f64> {
    v.as_f64()
}

fn yaml_string(v: &serde_yaml::Value) -> Option<String> {
    match v {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Tagged(t) => yaml_string(&t.value),
        _ => None,
    }
}

fn yaml_vec<T>(
    v: &serde_yaml::Value,
    item: impl Fn(&serde_yaml::Value) -> Option<T>,
) -> Option<Vec<T>> {
    v.as_sequence().map(|xs| xs.iter().filter_map(|x| item(x)).collect())
}

#[allow(non_snake_case, non_camel_case_types, dead_code)]
pub mod robot {
    #[allow(non_snake_case, non_camel_case_types, dead_code)]
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Limits {
        pub speed: f64,
    }

    impl Limits {
        /// Assign every field whose key is present; missing keys keep their value.
        pub fn update_from_yaml(&mut self, node: &serde_yaml::Value) {
            if let Some(v) = node.get("speed").and_then(super::yaml_f64) {
                self.speed = v;
            }
        }
    }

    #[allow(non_snake_case, non_camel_case_types, dead_code)]
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Sensor {
        pub id: i64,
    }

    impl Sensor {
        /// Assign every field whose key is present; missing keys keep their value.
        pub fn update_from_yaml(&mut self, node: &serde_yaml::Value) {
            if let Some(v) = node.get("id").and_then(super::yaml_i64) {
                self.id = v;
            }
        }
    }

    #[allow(non_snake_case, non_camel_case_types, dead_code)]
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Ros2_node {
        pub hz: i64,
    }

    impl Ros2_node {
        /// Assign every field whose key is present; missing keys keep their value.
        pub fn update_from_yaml(&mut self, node: &serde_yaml::Value) {
            if let Some(v) = node.get("hz").and_then(super::yaml_i64) {
                self.hz = v;
            }
        }
    }

    #[allow(non_snake_case, non_camel_case_types, dead_code)]
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct auto_Robot {
        pub name: String,
        pub rate: i64,
        pub limits: super::robot::Limits,
        pub sensors: Vec<super::robot::Sensor>,
        pub ros2_node: super::robot::Ros2_node,
    }

    impl auto_Robot {
        /// Assign every field whose key is present; missing keys keep their value.
        pub fn update_from_yaml(&mut self, node: &serde_yaml::Value) {
            if let Some(v) = node.get("name").and_then(super::yaml_string) {
                self.name = v;
            }
            if let Some(v) = node.get("rate").and_then(super::yaml_i64) {
                self.rate = v;
            }
            if let Some(v) = node.get("limits") {
                self.limits.update_from_yaml(v);
            }
            if let Some(v) = node.get("sensors").and_then(|v: &serde_yaml::Value| super::yaml_vec(v, |v: &serde_yaml::Value| { let mut x = super::robot::Sensor::default(); x.update_from_yaml(v); Some(x) })) {
                self.sensors = v;
            }
            if let Some(v) = node.get("ros2.node") {
                self.ros2_node.update_from_yaml(v);
            }
        }
    }

}

#[allow(non_snake_case, non_camel_case_types, dead_code)]
pub mod arm {
    #[allow(non_snake_case, non_camel_case_types, dead_code)]
    pub mod joint {
        #[allow(non_snake_case, non_camel_case_types, dead_code)]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct auto_Joint {
            pub names: Vec<String>,
            pub enabled: bool,
        }

        impl auto_Joint {
            /// Assign every field whose key is present; missing keys keep their value.
            pub fn update_from_yaml(&mut self, node: &serde_yaml::Value) {
                if let Some(v) = node.get("names").and_then(|v: &serde_yaml::Value| super::super::yaml_vec(v, super::super::yaml_string)) {
                    self.names = v;
                }
                if let Some(v) = node.get("enabled").and_then(super::super::yaml_bool) {
                    self.enabled = v;
                }
            }
        }

    }

}

#[derive(Debug)]
pub enum ReloadError {
    Io { path: std::path::PathBuf, source: std::io::Error },
    Parse { path: std::path::PathBuf, source: serde_yaml::Error },
    UnknownUnit(String),
}

impl std::fmt::Display for ReloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Parse { path, source } => write!(f, "failed to parse {}: {source}", path.display()),
            Self::UnknownUnit(name) => write!(f, "no configuration unit named `{name}`"),
        }
    }
}

impl std::error::Error for ReloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::UnknownUnit(_) => None,
        }
    }
}

#[allow(non_snake_case, non_camel_case_types, dead_code)]
#[derive(Debug, Default)]
pub struct ConfigCollect {
    robot: std::sync::RwLock<robot::auto_Robot>,
    arm_joint: std::sync::RwLock<arm::joint::auto_Joint>,
}

#[allow(unused_variables)]
impl ConfigCollect {
    /// Reload one unit by name from `base_path`.
    pub fn update_from_yaml(&self, name: &str, base_path: impl AsRef<std::path::Path>) -> Result<(), ReloadError> {
        let base_path = base_path.as_ref();
        match name {
            "robot" => self.update_from_yaml_robot(base_path),
            "arm_joint" => self.update_from_yaml_arm_joint(base_path),
            _ => Err(ReloadError::UnknownUnit(name.to_string())),
        }
    }

    /// Reload every unit from `base_path`, stopping at the first failure.
    pub fn update_from_yaml_all(&self, base_path: impl AsRef<std::path::Path>) -> Result<(), ReloadError> {
        let base_path = base_path.as_ref();
        self.update_from_yaml_robot(base_path)?;
        self.update_from_yaml_arm_joint(base_path)?;
        Ok(())
    }

    /// `Robot::auto_Robot` (5 fields).
    pub fn robot(&self) -> robot::auto_Robot {
        self.robot.read().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    fn update_from_yaml_robot(&self, base_path: &std::path::Path) -> Result<(), ReloadError> {
        let node = load_yaml(&base_path.join("robot.yaml"))?;
        let mut unit = self.robot.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        unit.update_from_yaml(&node);
        Ok(())
    }

    /// `Arm::Joint::auto_Joint` (2 fields).
    pub fn arm_joint(&self) -> arm::joint::auto_Joint {
        self.arm_joint.read().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    fn update_from_yaml_arm_joint(&self, base_path: &std::path::Path) -> Result<(), ReloadError> {
        let node = load_yaml(&base_path.join("arm").join("joint.yaml"))?;
        let mut unit = self.arm_joint.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        unit.update_from_yaml(&node);
        Ok(())
    }
}

fn load_yaml(path: &std::path::Path) -> Result<serde_yaml::Value, ReloadError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ReloadError::Io { path: path.to_path_buf(), source })?;
    serde_yaml::from_str(&text)
        .map_err(|source| ReloadError::Parse { path: path.to_path_buf(), source })
}
