// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The task definition document, in the shape of an ECS `RegisterTaskDefinition`
//! request.
//!
//! The document is read as YAML (which also accepts JSON) and handed to ECS as
//! is. Keys are camelCase like the ECS API and cover the whole request, so any
//! document ECS accepts parses here. Unknown keys are rejected instead of
//! silently dropped; values are not validated here, ECS does that.

use crate::orchestrator::{OrchError, OrchResult};
use aws_sdk_ecs::{
    error::BuildError,
    operation::register_task_definition::builders::RegisterTaskDefinitionFluentBuilder,
    types as ecs,
};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskDefinition {
    pub family: Option<String>,
    pub task_role_arn: Option<String>,
    pub execution_role_arn: Option<String>,
    pub network_mode: Option<String>,
    pub container_definitions: Option<Vec<ContainerDefinition>>,
    pub volumes: Option<Vec<Volume>>,
    pub placement_constraints: Option<Vec<PlacementConstraint>>,
    pub requires_compatibilities: Option<Vec<String>>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub pid_mode: Option<String>,
    pub ipc_mode: Option<String>,
    pub proxy_configuration: Option<ProxyConfiguration>,
    pub inference_accelerators: Option<Vec<InferenceAccelerator>>,
    pub ephemeral_storage: Option<EphemeralStorage>,
    pub runtime_platform: Option<RuntimePlatform>,
    pub enable_fault_injection: Option<bool>,
}

impl TaskDefinition {
    pub fn from_file(path: &Path) -> OrchResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| OrchError::Init {
            dbg: format!("Failed to read task definition file {}. {err}", path.display()),
        })?;
        Self::parse(&contents).map_err(|err| OrchError::TaskDefinition {
            dbg: format!("{} ({})", err, path.display()),
        })
    }

    pub fn parse(contents: &str) -> OrchResult<Self> {
        serde_yaml::from_str(contents).map_err(|err| OrchError::TaskDefinition {
            dbg: format!("Failed to parse task definition. {err}"),
        })
    }

    /// Copy the document onto a `RegisterTaskDefinition` request.
    // Inference accelerators are retired by ECS but still part of the request,
    // so a document naming them is forwarded and ECS answers for it.
    #[allow(deprecated)]
    pub fn to_request(
        &self,
        request: RegisterTaskDefinitionFluentBuilder,
    ) -> OrchResult<RegisterTaskDefinitionFluentBuilder> {
        Ok(request
            .set_family(self.family.clone())
            .set_task_role_arn(self.task_role_arn.clone())
            .set_execution_role_arn(self.execution_role_arn.clone())
            .set_network_mode(enum_of(&self.network_mode))
            .set_container_definitions(convert_all(
                &self.container_definitions,
                ContainerDefinition::to_sdk,
            )?)
            .set_volumes(convert_all(&self.volumes, Volume::to_sdk)?)
            .set_placement_constraints(convert_all(
                &self.placement_constraints,
                PlacementConstraint::to_sdk,
            )?)
            .set_requires_compatibilities(enums_of(&self.requires_compatibilities))
            .set_cpu(self.cpu.clone())
            .set_memory(self.memory.clone())
            .set_tags(convert_all(&self.tags, Tag::to_sdk)?)
            .set_pid_mode(enum_of(&self.pid_mode))
            .set_ipc_mode(enum_of(&self.ipc_mode))
            .set_proxy_configuration(convert_opt(
                &self.proxy_configuration,
                ProxyConfiguration::to_sdk,
            )?)
            .set_inference_accelerators(convert_all(
                &self.inference_accelerators,
                InferenceAccelerator::to_sdk,
            )?)
            .set_ephemeral_storage(convert_opt(&self.ephemeral_storage, EphemeralStorage::to_sdk)?)
            .set_runtime_platform(convert_opt(&self.runtime_platform, RuntimePlatform::to_sdk)?)
            .set_enable_fault_injection(self.enable_fault_injection))
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContainerDefinition {
    pub name: Option<String>,
    pub image: Option<String>,
    pub repository_credentials: Option<RepositoryCredentials>,
    pub cpu: Option<i32>,
    pub memory: Option<i32>,
    pub memory_reservation: Option<i32>,
    pub links: Option<Vec<String>>,
    pub port_mappings: Option<Vec<PortMapping>>,
    pub essential: Option<bool>,
    pub restart_policy: Option<ContainerRestartPolicy>,
    pub entry_point: Option<Vec<String>>,
    pub command: Option<Vec<String>>,
    pub environment: Option<Vec<KeyValuePair>>,
    pub environment_files: Option<Vec<EnvironmentFile>>,
    pub mount_points: Option<Vec<MountPoint>>,
    pub volumes_from: Option<Vec<VolumeFrom>>,
    pub linux_parameters: Option<LinuxParameters>,
    pub secrets: Option<Vec<Secret>>,
    pub depends_on: Option<Vec<ContainerDependency>>,
    pub start_timeout: Option<i32>,
    pub stop_timeout: Option<i32>,
    pub version_consistency: Option<String>,
    pub hostname: Option<String>,
    pub user: Option<String>,
    pub working_directory: Option<String>,
    pub disable_networking: Option<bool>,
    pub privileged: Option<bool>,
    pub readonly_root_filesystem: Option<bool>,
    pub dns_servers: Option<Vec<String>>,
    pub dns_search_domains: Option<Vec<String>>,
    pub extra_hosts: Option<Vec<HostEntry>>,
    pub docker_security_options: Option<Vec<String>>,
    pub interactive: Option<bool>,
    pub pseudo_terminal: Option<bool>,
    pub docker_labels: Option<HashMap<String, String>>,
    pub ulimits: Option<Vec<Ulimit>>,
    pub log_configuration: Option<LogConfiguration>,
    pub health_check: Option<HealthCheck>,
    pub system_controls: Option<Vec<SystemControl>>,
    pub resource_requirements: Option<Vec<ResourceRequirement>>,
    pub firelens_configuration: Option<FirelensConfiguration>,
    pub credential_specs: Option<Vec<String>>,
}

impl ContainerDefinition {
    fn to_sdk(&self) -> OrchResult<ecs::ContainerDefinition> {
        ecs::ContainerDefinition::builder()
            .set_name(self.name.clone())
            .set_image(self.image.clone())
            .set_repository_credentials(convert_opt(
                &self.repository_credentials,
                RepositoryCredentials::to_sdk,
            )?)
            .set_cpu(self.cpu)
            .set_memory(self.memory)
            .set_memory_reservation(self.memory_reservation)
            .set_links(self.links.clone())
            .set_port_mappings(convert_all(&self.port_mappings, PortMapping::to_sdk)?)
            .set_essential(self.essential)
            .set_restart_policy(convert_opt(&self.restart_policy, ContainerRestartPolicy::to_sdk)?)
            .set_entry_point(self.entry_point.clone())
            .set_command(self.command.clone())
            .set_environment(convert_all(&self.environment, KeyValuePair::to_sdk)?)
            .set_environment_files(convert_all(&self.environment_files, EnvironmentFile::to_sdk)?)
            .set_mount_points(convert_all(&self.mount_points, MountPoint::to_sdk)?)
            .set_volumes_from(convert_all(&self.volumes_from, VolumeFrom::to_sdk)?)
            .set_linux_parameters(convert_opt(&self.linux_parameters, LinuxParameters::to_sdk)?)
            .set_secrets(convert_all(&self.secrets, Secret::to_sdk)?)
            .set_depends_on(convert_all(&self.depends_on, ContainerDependency::to_sdk)?)
            .set_start_timeout(self.start_timeout)
            .set_stop_timeout(self.stop_timeout)
            .set_version_consistency(enum_of(&self.version_consistency))
            .set_hostname(self.hostname.clone())
            .set_user(self.user.clone())
            .set_working_directory(self.working_directory.clone())
            .set_disable_networking(self.disable_networking)
            .set_privileged(self.privileged)
            .set_readonly_root_filesystem(self.readonly_root_filesystem)
            .set_dns_servers(self.dns_servers.clone())
            .set_dns_search_domains(self.dns_search_domains.clone())
            .set_extra_hosts(convert_all(&self.extra_hosts, HostEntry::to_sdk)?)
            .set_docker_security_options(self.docker_security_options.clone())
            .set_interactive(self.interactive)
            .set_pseudo_terminal(self.pseudo_terminal)
            .set_docker_labels(self.docker_labels.clone())
            .set_ulimits(convert_all(&self.ulimits, Ulimit::to_sdk)?)
            .set_log_configuration(convert_opt(&self.log_configuration, LogConfiguration::to_sdk)?)
            .set_health_check(convert_opt(&self.health_check, HealthCheck::to_sdk)?)
            .set_system_controls(convert_all(&self.system_controls, SystemControl::to_sdk)?)
            .set_resource_requirements(convert_all(
                &self.resource_requirements,
                ResourceRequirement::to_sdk,
            )?)
            .set_firelens_configuration(convert_opt(
                &self.firelens_configuration,
                FirelensConfiguration::to_sdk,
            )?)
            .set_credential_specs(self.credential_specs.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RepositoryCredentials {
    pub credentials_parameter: Option<String>,
}

impl RepositoryCredentials {
    fn to_sdk(&self) -> OrchResult<ecs::RepositoryCredentials> {
        ecs::RepositoryCredentials::builder()
            .set_credentials_parameter(self.credentials_parameter.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PortMapping {
    pub container_port: Option<i32>,
    pub host_port: Option<i32>,
    pub protocol: Option<String>,
    pub name: Option<String>,
    pub app_protocol: Option<String>,
    pub container_port_range: Option<String>,
}

impl PortMapping {
    fn to_sdk(&self) -> OrchResult<ecs::PortMapping> {
        ecs::PortMapping::builder()
            .set_container_port(self.container_port)
            .set_host_port(self.host_port)
            .set_protocol(enum_of(&self.protocol))
            .set_name(self.name.clone())
            .set_app_protocol(enum_of(&self.app_protocol))
            .set_container_port_range(self.container_port_range.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContainerRestartPolicy {
    pub enabled: Option<bool>,
    pub ignored_exit_codes: Option<Vec<i32>>,
    pub restart_attempt_period: Option<i32>,
}

impl ContainerRestartPolicy {
    fn to_sdk(&self) -> OrchResult<ecs::ContainerRestartPolicy> {
        ecs::ContainerRestartPolicy::builder()
            .set_enabled(self.enabled)
            .set_ignored_exit_codes(self.ignored_exit_codes.clone())
            .set_restart_attempt_period(self.restart_attempt_period)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KeyValuePair {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl KeyValuePair {
    fn to_sdk(&self) -> OrchResult<ecs::KeyValuePair> {
        ecs::KeyValuePair::builder()
            .set_name(self.name.clone())
            .set_value(self.value.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentFile {
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl EnvironmentFile {
    fn to_sdk(&self) -> OrchResult<ecs::EnvironmentFile> {
        ecs::EnvironmentFile::builder()
            .set_value(self.value.clone())
            .set_type(enum_of(&self.kind))
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MountPoint {
    pub source_volume: Option<String>,
    pub container_path: Option<String>,
    pub read_only: Option<bool>,
}

impl MountPoint {
    fn to_sdk(&self) -> OrchResult<ecs::MountPoint> {
        ecs::MountPoint::builder()
            .set_source_volume(self.source_volume.clone())
            .set_container_path(self.container_path.clone())
            .set_read_only(self.read_only)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VolumeFrom {
    pub source_container: Option<String>,
    pub read_only: Option<bool>,
}

impl VolumeFrom {
    fn to_sdk(&self) -> OrchResult<ecs::VolumeFrom> {
        ecs::VolumeFrom::builder()
            .set_source_container(self.source_container.clone())
            .set_read_only(self.read_only)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinuxParameters {
    pub capabilities: Option<KernelCapabilities>,
    pub devices: Option<Vec<Device>>,
    pub init_process_enabled: Option<bool>,
    pub shared_memory_size: Option<i32>,
    pub tmpfs: Option<Vec<Tmpfs>>,
    pub max_swap: Option<i32>,
    pub swappiness: Option<i32>,
}

impl LinuxParameters {
    fn to_sdk(&self) -> OrchResult<ecs::LinuxParameters> {
        ecs::LinuxParameters::builder()
            .set_capabilities(convert_opt(&self.capabilities, KernelCapabilities::to_sdk)?)
            .set_devices(convert_all(&self.devices, Device::to_sdk)?)
            .set_init_process_enabled(self.init_process_enabled)
            .set_shared_memory_size(self.shared_memory_size)
            .set_tmpfs(convert_all(&self.tmpfs, Tmpfs::to_sdk)?)
            .set_max_swap(self.max_swap)
            .set_swappiness(self.swappiness)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KernelCapabilities {
    pub add: Option<Vec<String>>,
    pub drop: Option<Vec<String>>,
}

impl KernelCapabilities {
    fn to_sdk(&self) -> OrchResult<ecs::KernelCapabilities> {
        ecs::KernelCapabilities::builder()
            .set_add(self.add.clone())
            .set_drop(self.drop.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Device {
    pub host_path: Option<String>,
    pub container_path: Option<String>,
    pub permissions: Option<Vec<String>>,
}

impl Device {
    fn to_sdk(&self) -> OrchResult<ecs::Device> {
        ecs::Device::builder()
            .set_host_path(self.host_path.clone())
            .set_container_path(self.container_path.clone())
            .set_permissions(enums_of(&self.permissions))
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Tmpfs {
    pub container_path: Option<String>,
    pub size: Option<i32>,
    pub mount_options: Option<Vec<String>>,
}

impl Tmpfs {
    fn to_sdk(&self) -> OrchResult<ecs::Tmpfs> {
        ecs::Tmpfs::builder()
            .set_container_path(self.container_path.clone())
            .set_size(self.size)
            .set_mount_options(self.mount_options.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Secret {
    pub name: Option<String>,
    pub value_from: Option<String>,
}

impl Secret {
    fn to_sdk(&self) -> OrchResult<ecs::Secret> {
        ecs::Secret::builder()
            .set_name(self.name.clone())
            .set_value_from(self.value_from.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContainerDependency {
    pub container_name: Option<String>,
    pub condition: Option<String>,
}

impl ContainerDependency {
    fn to_sdk(&self) -> OrchResult<ecs::ContainerDependency> {
        ecs::ContainerDependency::builder()
            .set_container_name(self.container_name.clone())
            .set_condition(enum_of(&self.condition))
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HostEntry {
    pub hostname: Option<String>,
    pub ip_address: Option<String>,
}

impl HostEntry {
    fn to_sdk(&self) -> OrchResult<ecs::HostEntry> {
        ecs::HostEntry::builder()
            .set_hostname(self.hostname.clone())
            .set_ip_address(self.ip_address.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Ulimit {
    pub name: Option<String>,
    pub soft_limit: Option<i32>,
    pub hard_limit: Option<i32>,
}

impl Ulimit {
    fn to_sdk(&self) -> OrchResult<ecs::Ulimit> {
        ecs::Ulimit::builder()
            .set_name(enum_of(&self.name))
            .set_soft_limit(self.soft_limit)
            .set_hard_limit(self.hard_limit)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LogConfiguration {
    pub log_driver: Option<String>,
    pub options: Option<HashMap<String, String>>,
    pub secret_options: Option<Vec<Secret>>,
}

impl LogConfiguration {
    fn to_sdk(&self) -> OrchResult<ecs::LogConfiguration> {
        ecs::LogConfiguration::builder()
            .set_log_driver(enum_of(&self.log_driver))
            .set_options(self.options.clone())
            .set_secret_options(convert_all(&self.secret_options, Secret::to_sdk)?)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HealthCheck {
    pub command: Option<Vec<String>>,
    pub interval: Option<i32>,
    pub timeout: Option<i32>,
    pub retries: Option<i32>,
    pub start_period: Option<i32>,
}

impl HealthCheck {
    fn to_sdk(&self) -> OrchResult<ecs::HealthCheck> {
        ecs::HealthCheck::builder()
            .set_command(self.command.clone())
            .set_interval(self.interval)
            .set_timeout(self.timeout)
            .set_retries(self.retries)
            .set_start_period(self.start_period)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SystemControl {
    pub namespace: Option<String>,
    pub value: Option<String>,
}

impl SystemControl {
    fn to_sdk(&self) -> OrchResult<ecs::SystemControl> {
        ecs::SystemControl::builder()
            .set_namespace(self.namespace.clone())
            .set_value(self.value.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceRequirement {
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ResourceRequirement {
    fn to_sdk(&self) -> OrchResult<ecs::ResourceRequirement> {
        ecs::ResourceRequirement::builder()
            .set_value(self.value.clone())
            .set_type(enum_of(&self.kind))
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FirelensConfiguration {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub options: Option<HashMap<String, String>>,
}

impl FirelensConfiguration {
    fn to_sdk(&self) -> OrchResult<ecs::FirelensConfiguration> {
        ecs::FirelensConfiguration::builder()
            .set_type(enum_of(&self.kind))
            .set_options(self.options.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Volume {
    pub name: Option<String>,
    pub host: Option<HostVolumeProperties>,
    pub docker_volume_configuration: Option<DockerVolumeConfiguration>,
    pub efs_volume_configuration: Option<EfsVolumeConfiguration>,
    pub fsx_windows_file_server_volume_configuration:
        Option<FsxWindowsFileServerVolumeConfiguration>,
    pub configured_at_launch: Option<bool>,
}

impl Volume {
    fn to_sdk(&self) -> OrchResult<ecs::Volume> {
        ecs::Volume::builder()
            .set_name(self.name.clone())
            .set_host(convert_opt(&self.host, HostVolumeProperties::to_sdk)?)
            .set_docker_volume_configuration(convert_opt(
                &self.docker_volume_configuration,
                DockerVolumeConfiguration::to_sdk,
            )?)
            .set_efs_volume_configuration(convert_opt(
                &self.efs_volume_configuration,
                EfsVolumeConfiguration::to_sdk,
            )?)
            .set_fsx_windows_file_server_volume_configuration(convert_opt(
                &self.fsx_windows_file_server_volume_configuration,
                FsxWindowsFileServerVolumeConfiguration::to_sdk,
            )?)
            .set_configured_at_launch(self.configured_at_launch)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HostVolumeProperties {
    pub source_path: Option<String>,
}

impl HostVolumeProperties {
    fn to_sdk(&self) -> OrchResult<ecs::HostVolumeProperties> {
        ecs::HostVolumeProperties::builder()
            .set_source_path(self.source_path.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DockerVolumeConfiguration {
    pub scope: Option<String>,
    pub autoprovision: Option<bool>,
    pub driver: Option<String>,
    pub driver_opts: Option<HashMap<String, String>>,
    pub labels: Option<HashMap<String, String>>,
}

impl DockerVolumeConfiguration {
    fn to_sdk(&self) -> OrchResult<ecs::DockerVolumeConfiguration> {
        ecs::DockerVolumeConfiguration::builder()
            .set_scope(enum_of(&self.scope))
            .set_autoprovision(self.autoprovision)
            .set_driver(self.driver.clone())
            .set_driver_opts(self.driver_opts.clone())
            .set_labels(self.labels.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EfsVolumeConfiguration {
    pub file_system_id: Option<String>,
    pub root_directory: Option<String>,
    pub transit_encryption: Option<String>,
    pub transit_encryption_port: Option<i32>,
    pub authorization_config: Option<EfsAuthorizationConfig>,
}

impl EfsVolumeConfiguration {
    fn to_sdk(&self) -> OrchResult<ecs::EfsVolumeConfiguration> {
        ecs::EfsVolumeConfiguration::builder()
            .set_file_system_id(self.file_system_id.clone())
            .set_root_directory(self.root_directory.clone())
            .set_transit_encryption(enum_of(&self.transit_encryption))
            .set_transit_encryption_port(self.transit_encryption_port)
            .set_authorization_config(convert_opt(
                &self.authorization_config,
                EfsAuthorizationConfig::to_sdk,
            )?)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EfsAuthorizationConfig {
    pub access_point_id: Option<String>,
    pub iam: Option<String>,
}

impl EfsAuthorizationConfig {
    fn to_sdk(&self) -> OrchResult<ecs::EfsAuthorizationConfig> {
        ecs::EfsAuthorizationConfig::builder()
            .set_access_point_id(self.access_point_id.clone())
            .set_iam(enum_of(&self.iam))
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FsxWindowsFileServerVolumeConfiguration {
    pub file_system_id: Option<String>,
    pub root_directory: Option<String>,
    pub authorization_config: Option<FsxWindowsFileServerAuthorizationConfig>,
}

impl FsxWindowsFileServerVolumeConfiguration {
    fn to_sdk(&self) -> OrchResult<ecs::FSxWindowsFileServerVolumeConfiguration> {
        ecs::FSxWindowsFileServerVolumeConfiguration::builder()
            .set_file_system_id(self.file_system_id.clone())
            .set_root_directory(self.root_directory.clone())
            .set_authorization_config(convert_opt(
                &self.authorization_config,
                FsxWindowsFileServerAuthorizationConfig::to_sdk,
            )?)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FsxWindowsFileServerAuthorizationConfig {
    pub credentials_parameter: Option<String>,
    pub domain: Option<String>,
}

impl FsxWindowsFileServerAuthorizationConfig {
    fn to_sdk(&self) -> OrchResult<ecs::FSxWindowsFileServerAuthorizationConfig> {
        ecs::FSxWindowsFileServerAuthorizationConfig::builder()
            .set_credentials_parameter(self.credentials_parameter.clone())
            .set_domain(self.domain.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlacementConstraint {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub expression: Option<String>,
}

impl PlacementConstraint {
    fn to_sdk(&self) -> OrchResult<ecs::TaskDefinitionPlacementConstraint> {
        ecs::TaskDefinitionPlacementConstraint::builder()
            .set_type(enum_of(&self.kind))
            .set_expression(self.expression.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Tag {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Tag {
    fn to_sdk(&self) -> OrchResult<ecs::Tag> {
        ecs::Tag::builder()
            .set_key(self.key.clone())
            .set_value(self.value.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProxyConfiguration {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub container_name: Option<String>,
    pub properties: Option<Vec<KeyValuePair>>,
}

impl ProxyConfiguration {
    fn to_sdk(&self) -> OrchResult<ecs::ProxyConfiguration> {
        ecs::ProxyConfiguration::builder()
            .set_type(enum_of(&self.kind))
            .set_container_name(self.container_name.clone())
            .set_properties(convert_all(&self.properties, KeyValuePair::to_sdk)?)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InferenceAccelerator {
    pub device_name: Option<String>,
    pub device_type: Option<String>,
}

impl InferenceAccelerator {
    #[allow(deprecated)]
    fn to_sdk(&self) -> OrchResult<ecs::InferenceAccelerator> {
        ecs::InferenceAccelerator::builder()
            .set_device_name(self.device_name.clone())
            .set_device_type(self.device_type.clone())
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EphemeralStorage {
    #[serde(rename = "sizeInGiB")]
    pub size_in_gib: Option<i32>,
}

impl EphemeralStorage {
    fn to_sdk(&self) -> OrchResult<ecs::EphemeralStorage> {
        ecs::EphemeralStorage::builder()
            .set_size_in_gib(self.size_in_gib)
            .build()
            .built()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuntimePlatform {
    pub cpu_architecture: Option<String>,
    pub operating_system_family: Option<String>,
}

impl RuntimePlatform {
    fn to_sdk(&self) -> OrchResult<ecs::RuntimePlatform> {
        ecs::RuntimePlatform::builder()
            .set_cpu_architecture(enum_of(&self.cpu_architecture))
            .set_operating_system_family(enum_of(&self.operating_system_family))
            .build()
            .built()
    }
}

/// The outcome of an SDK `build()`.
///
/// A builder returns `Result<_, BuildError>` only while its shape has a
/// required member without a default, and SDK releases move shapes between
/// the two. Every shape built above is listed so either form converts.
trait Built {
    type Output;

    fn built(self) -> OrchResult<Self::Output>;
}

impl<T> Built for Result<T, BuildError> {
    type Output = T;

    fn built(self) -> OrchResult<T> {
        self.map_err(OrchError::from)
    }
}

macro_rules! impl_built {
    ($($shape:ident),* $(,)?) => {
        $(
            #[allow(deprecated)]
            impl Built for ecs::$shape {
                type Output = Self;

                fn built(self) -> OrchResult<Self> {
                    Ok(self)
                }
            }
        )*
    };
}

impl_built!(
    ContainerDefinition,
    ContainerRestartPolicy,
    Device,
    DockerVolumeConfiguration,
    EfsAuthorizationConfig,
    EfsVolumeConfiguration,
    EnvironmentFile,
    EphemeralStorage,
    FSxWindowsFileServerAuthorizationConfig,
    FSxWindowsFileServerVolumeConfiguration,
    FirelensConfiguration,
    HealthCheck,
    HostEntry,
    HostVolumeProperties,
    InferenceAccelerator,
    KernelCapabilities,
    KeyValuePair,
    LinuxParameters,
    LogConfiguration,
    MountPoint,
    PortMapping,
    ProxyConfiguration,
    RepositoryCredentials,
    ResourceRequirement,
    RuntimePlatform,
    Secret,
    SystemControl,
    Tag,
    TaskDefinitionPlacementConstraint,
    Tmpfs,
    Ulimit,
    Volume,
    VolumeFrom,
);

// SDK enums keep values they don't know as `Unknown`, so the conversion never fails.
fn enum_of<E: for<'a> From<&'a str>>(value: &Option<String>) -> Option<E> {
    value.as_deref().map(E::from)
}

fn enums_of<E: for<'a> From<&'a str>>(values: &Option<Vec<String>>) -> Option<Vec<E>> {
    values
        .as_ref()
        .map(|values| values.iter().map(|value| E::from(value.as_str())).collect())
}

fn convert_all<T, U>(
    items: &Option<Vec<T>>,
    f: impl Fn(&T) -> OrchResult<U>,
) -> OrchResult<Option<Vec<U>>> {
    items
        .as_ref()
        .map(|items| items.iter().map(f).collect::<OrchResult<Vec<U>>>())
        .transpose()
}

fn convert_opt<T, U>(
    item: &Option<T>,
    f: impl Fn(&T) -> OrchResult<U>,
) -> OrchResult<Option<U>> {
    item.as_ref().map(f).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ecs::config::{BehaviorVersion, Region};
    use std::io::Write;

    const YAML: &str = r#"
family: migrate
executionRoleArn: arn:aws:iam::123456789012:role/ecsTaskExecutionRole
networkMode: awsvpc
requiresCompatibilities:
  - FARGATE
cpu: "256"
memory: "512"
containerDefinitions:
  - name: app
    image: 123456789012.dkr.ecr.us-east-1.amazonaws.com/app:latest
    essential: true
    command: ["bundle", "exec", "rake", "db:migrate"]
    environment:
      - name: RAILS_ENV
        value: production
    secrets:
      - name: DATABASE_URL
        valueFrom: arn:aws:ssm:us-east-1:123456789012:parameter/database-url
    logConfiguration:
      logDriver: awslogs
      options:
        awslogs-group: /ecs/migrate
        awslogs-region: us-east-1
        awslogs-stream-prefix: ecs
ephemeralStorage:
  sizeInGiB: 21
"#;

    fn client() -> aws_sdk_ecs::Client {
        let config = aws_sdk_ecs::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        aws_sdk_ecs::Client::from_conf(config)
    }

    #[test]
    fn parse_yaml() {
        let task_definition = TaskDefinition::parse(YAML).unwrap();
        assert_eq!(task_definition.family.as_deref(), Some("migrate"));
        assert_eq!(task_definition.network_mode.as_deref(), Some("awsvpc"));
        assert_eq!(task_definition.cpu.as_deref(), Some("256"));
        assert_eq!(
            task_definition.ephemeral_storage,
            Some(EphemeralStorage {
                size_in_gib: Some(21)
            })
        );

        let containers = task_definition.container_definitions.unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name.as_deref(), Some("app"));
        assert_eq!(containers[0].essential, Some(true));
        let options = containers[0]
            .log_configuration
            .as_ref()
            .unwrap()
            .options
            .as_ref()
            .unwrap();
        assert_eq!(options["awslogs-group"], "/ecs/migrate");
    }

    #[test]
    fn parse_json() {
        let json = r#"{
            "family": "migrate",
            "containerDefinitions": [
                {
                    "name": "app",
                    "image": "busybox",
                    "memory": 128,
                    "portMappings": [{ "containerPort": 8080, "protocol": "tcp" }]
                }
            ]
        }"#;
        let task_definition = TaskDefinition::parse(json).unwrap();
        let containers = task_definition.container_definitions.unwrap();
        assert_eq!(containers[0].memory, Some(128));
        assert_eq!(
            containers[0].port_mappings.as_ref().unwrap()[0].container_port,
            Some(8080)
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        // keys only present in a DescribeTaskDefinition response
        let err = TaskDefinition::parse("family: migrate\nrevision: 3\n").unwrap_err();
        assert!(matches!(err, OrchError::TaskDefinition { .. }));

        let err = TaskDefinition::parse("containerDefinitions:\n  - name: app\n    imag: busybox\n")
            .unwrap_err();
        assert!(matches!(err, OrchError::TaskDefinition { .. }));
    }

    #[test]
    fn malformed_document() {
        let err = TaskDefinition::parse("family: [migrate").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse task definition."));
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let task_definition = TaskDefinition::from_file(file.path()).unwrap();
        assert_eq!(task_definition, TaskDefinition::parse(YAML).unwrap());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TaskDefinition::from_file(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, OrchError::Init { .. }));
    }

    #[test]
    fn request_carries_document() {
        let task_definition = TaskDefinition::parse(YAML).unwrap();
        let request = task_definition
            .to_request(client().register_task_definition())
            .unwrap();
        let input = request.as_input();

        assert_eq!(input.get_family(), &Some("migrate".to_string()));
        assert_eq!(input.get_network_mode(), &Some(ecs::NetworkMode::Awsvpc));
        assert_eq!(
            input.get_requires_compatibilities(),
            &Some(vec![ecs::Compatibility::Fargate])
        );
        assert_eq!(input.get_memory(), &Some("512".to_string()));

        let containers = input.get_container_definitions().as_ref().unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name(), Some("app"));
        assert_eq!(
            containers[0].command(),
            &["bundle", "exec", "rake", "db:migrate"]
        );
        assert_eq!(
            containers[0].environment(),
            &[ecs::KeyValuePair::builder()
                .name("RAILS_ENV")
                .value("production")
                .build()
                .built()
                .unwrap()]
        );
        assert_eq!(
            containers[0].secrets(),
            &[ecs::Secret::builder()
                .name("DATABASE_URL")
                .value_from("arn:aws:ssm:us-east-1:123456789012:parameter/database-url")
                .build()
                .built()
                .unwrap()]
        );
        assert_eq!(
            input
                .get_ephemeral_storage()
                .as_ref()
                .map(|storage| storage.size_in_gib()),
            Some(21)
        );
    }

    #[test]
    fn request_missing_required_nested_field() {
        let task_definition = TaskDefinition::parse(
            "containerDefinitions:\n  - name: app\n    secrets:\n      - name: DATABASE_URL\n",
        )
        .unwrap();
        let err = task_definition
            .to_request(client().register_task_definition())
            .unwrap_err();
        assert!(matches!(err, OrchError::TaskDefinition { .. }));
    }

    // Every part of the request which a plain service document leaves out.
    const FULL_YAML: &str = r#"
family: sidecar
enableFaultInjection: true
containerDefinitions:
  - name: app
    image: busybox
    versionConsistency: disabled
    dockerSecurityOptions: ["no-new-privileges"]
    credentialSpecs: ["credentialspecdomainless:arn:aws:s3:::specs/gmsa.json"]
    systemControls:
      - namespace: net.core.somaxconn
        value: "1024"
    extraHosts:
      - hostname: db.internal
        ipAddress: 10.0.0.5
    restartPolicy:
      enabled: true
      ignoredExitCodes: [0, 143]
      restartAttemptPeriod: 180
    portMappings:
      - containerPortRange: "8000-8010"
        protocol: tcp
    linuxParameters:
      devices:
        - hostPath: /dev/fuse
          containerPath: /dev/fuse
          permissions: [read, write]
      tmpfs:
        - containerPath: /scratch
          size: 64
          mountOptions: [noexec]
      maxSwap: 512
      swappiness: 10
volumes:
  - name: shared
    configuredAtLaunch: true
  - name: efs
    efsVolumeConfiguration:
      fileSystemId: fs-0a1b2c3d
      transitEncryption: ENABLED
      authorizationConfig:
        accessPointId: fsap-0a1b2c3d
        iam: ENABLED
  - name: fsx
    fsxWindowsFileServerVolumeConfiguration:
      fileSystemId: fs-0123456789abcdef0
      rootDirectory: share
      authorizationConfig:
        credentialsParameter: arn:aws:secretsmanager:us-east-1:123456789012:secret:fsx
        domain: corp.example.com
"#;

    #[test]
    fn request_carries_full_document() {
        let task_definition = TaskDefinition::parse(FULL_YAML).unwrap();
        let request = task_definition
            .to_request(client().register_task_definition())
            .unwrap();
        let input = request.as_input();

        assert_eq!(input.get_enable_fault_injection(), &Some(true));

        let container = &input.get_container_definitions().as_ref().unwrap()[0];
        assert_eq!(
            container.version_consistency(),
            Some(&ecs::VersionConsistency::from("disabled"))
        );
        assert_eq!(container.docker_security_options(), &["no-new-privileges"]);
        assert_eq!(
            container.credential_specs(),
            &["credentialspecdomainless:arn:aws:s3:::specs/gmsa.json"]
        );
        assert_eq!(
            container.system_controls(),
            &[ecs::SystemControl::builder()
                .namespace("net.core.somaxconn")
                .value("1024")
                .build()
                .built()
                .unwrap()]
        );
        assert_eq!(
            container.extra_hosts(),
            &[ecs::HostEntry::builder()
                .hostname("db.internal")
                .ip_address("10.0.0.5")
                .build()
                .built()
                .unwrap()]
        );
        assert_eq!(
            container.restart_policy(),
            Some(
                &ecs::ContainerRestartPolicy::builder()
                    .enabled(true)
                    .ignored_exit_codes(0)
                    .ignored_exit_codes(143)
                    .restart_attempt_period(180)
                    .build()
                    .built()
                    .unwrap()
            )
        );
        assert_eq!(
            container.port_mappings()[0].container_port_range(),
            Some("8000-8010")
        );

        let linux = container.linux_parameters().unwrap();
        assert_eq!(
            linux.devices(),
            &[ecs::Device::builder()
                .host_path("/dev/fuse")
                .container_path("/dev/fuse")
                .permissions(ecs::DeviceCgroupPermission::from("read"))
                .permissions(ecs::DeviceCgroupPermission::from("write"))
                .build()
                .built()
                .unwrap()]
        );
        assert_eq!(
            linux.tmpfs(),
            &[ecs::Tmpfs::builder()
                .container_path("/scratch")
                .size(64)
                .mount_options("noexec")
                .build()
                .built()
                .unwrap()]
        );
        assert_eq!(linux.max_swap(), Some(512));
        assert_eq!(linux.swappiness(), Some(10));

        let volumes = input.get_volumes().as_ref().unwrap();
        assert_eq!(volumes.len(), 3);
        assert_eq!(volumes[0].configured_at_launch(), Some(true));
        assert_eq!(
            volumes[1].efs_volume_configuration().unwrap().authorization_config(),
            Some(
                &ecs::EfsAuthorizationConfig::builder()
                    .access_point_id("fsap-0a1b2c3d")
                    .iam(ecs::EfsAuthorizationConfigIam::from("ENABLED"))
                    .build()
                    .built()
                    .unwrap()
            )
        );
        assert_eq!(
            volumes[2].fsx_windows_file_server_volume_configuration(),
            Some(
                &ecs::FSxWindowsFileServerVolumeConfiguration::builder()
                    .file_system_id("fs-0123456789abcdef0")
                    .root_directory("share")
                    .authorization_config(
                        ecs::FSxWindowsFileServerAuthorizationConfig::builder()
                            .credentials_parameter(
                                "arn:aws:secretsmanager:us-east-1:123456789012:secret:fsx"
                            )
                            .domain("corp.example.com")
                            .build()
                            .built()
                            .unwrap()
                    )
                    .build()
                    .built()
                    .unwrap()
            )
        );
    }

    #[test]
    fn fallible_and_infallible_builds() {
        let storage = EphemeralStorage {
            size_in_gib: Some(30),
        }
        .to_sdk()
        .unwrap();
        assert_eq!(storage.size_in_gib(), 30);

        // hostPath is required by ECS
        let err = Device::default().to_sdk().unwrap_err();
        assert!(matches!(err, OrchError::TaskDefinition { .. }));
    }
}
