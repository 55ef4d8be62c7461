use std::collections::BTreeMap;

use prometheus::{Gauge, GaugeVec, Opts, Registry, core::Collector};

use mex_core::{LabelConfig, Snapshot};
use mex_model::App;

/// Per-scrape application gauges.
///
/// A new set is created for every scrape and thrown away after gathering.
pub(crate) struct AppMetrics {
    instances_desired: GaugeVec,
    instances_running: GaugeVec,
    instances_staged: GaugeVec,
    instances_healthy: GaugeVec,
    instances_unhealthy: GaugeVec,
    cpus: GaugeVec,
    memory: GaugeVec,
    disk: GaugeVec,
    tasks: GaugeVec,
    tasks_unhealthy: GaugeVec,
    apps: Gauge,
}

impl AppMetrics {
    pub(crate) fn new(namespace: &str, labels: &LabelConfig) -> prometheus::Result<Self> {
        let mut app_labels: Vec<&str> = vec!["app"];
        app_labels.extend(labels.names().iter().map(String::as_str));
        let mut task_labels = app_labels.clone();
        task_labels.push("state");

        let app_gauge = |name: &str, help: &str| {
            GaugeVec::new(Opts::new(name, help).namespace(namespace), &app_labels)
        };

        Ok(Self {
            instances_desired: app_gauge("app_instances_desired", "Desired number of instances.")?,
            instances_running: app_gauge("app_instances_running", "Number of running tasks.")?,
            instances_staged: app_gauge("app_instances_staged", "Number of staged tasks.")?,
            instances_healthy: app_gauge(
                "app_instances_healthy",
                "Number of tasks passing all health checks.",
            )?,
            instances_unhealthy: app_gauge(
                "app_instances_unhealthy",
                "Number of tasks failing a health check.",
            )?,
            cpus: app_gauge("app_cpus", "CPU shares requested per instance.")?,
            memory: app_gauge("app_memory_megabytes", "Memory requested per instance.")?,
            disk: app_gauge("app_disk_megabytes", "Disk requested per instance.")?,
            tasks: GaugeVec::new(
                Opts::new("app_tasks", "Number of tasks by state.").namespace(namespace),
                &task_labels,
            )?,
            tasks_unhealthy: app_gauge(
                "app_tasks_unhealthy",
                "Number of tasks with a failing health check result.",
            )?,
            apps: Gauge::with_opts(
                Opts::new("apps", "Number of applications.").namespace(namespace),
            )?,
        })
    }

    pub(crate) fn observe(&self, labels: &LabelConfig, snapshot: &Snapshot) {
        self.apps.set(snapshot.apps.len() as f64);
        for app in &snapshot.apps {
            self.observe_app(labels, app);
        }
    }

    fn observe_app(&self, labels: &LabelConfig, app: &App) {
        let mut by_state: BTreeMap<String, u32> = BTreeMap::new();
        let mut unhealthy = 0u32;
        for task in app.tasks() {
            *by_state.entry(task.state_label()).or_default() += 1;
            if task.is_unhealthy() {
                unhealthy += 1;
            }
        }

        let mut values: Vec<&str> = Vec::with_capacity(labels.len() + 2);
        values.push(&app.id);
        values.extend(labels.extract(app));

        self.instances_desired
            .with_label_values(&values)
            .set(f64::from(app.instances));
        self.instances_running
            .with_label_values(&values)
            .set(f64::from(app.tasks_running));
        self.instances_staged
            .with_label_values(&values)
            .set(f64::from(app.tasks_staged));
        self.instances_healthy
            .with_label_values(&values)
            .set(f64::from(app.tasks_healthy));
        self.instances_unhealthy
            .with_label_values(&values)
            .set(f64::from(app.tasks_unhealthy));
        self.cpus.with_label_values(&values).set(app.cpus);
        self.memory.with_label_values(&values).set(app.mem);
        self.disk.with_label_values(&values).set(app.disk);
        self.tasks_unhealthy
            .with_label_values(&values)
            .set(f64::from(unhealthy));

        for (state, count) in &by_state {
            values.push(state);
            self.tasks.with_label_values(&values).set(f64::from(*count));
            values.pop();
        }
    }

    pub(crate) fn collectors(&self) -> Vec<Box<dyn Collector>> {
        vec![
            Box::new(self.instances_desired.clone()),
            Box::new(self.instances_running.clone()),
            Box::new(self.instances_staged.clone()),
            Box::new(self.instances_healthy.clone()),
            Box::new(self.instances_unhealthy.clone()),
            Box::new(self.cpus.clone()),
            Box::new(self.memory.clone()),
            Box::new(self.disk.clone()),
            Box::new(self.tasks.clone()),
            Box::new(self.tasks_unhealthy.clone()),
            Box::new(self.apps.clone()),
        ]
    }

    pub(crate) fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        for collector in self.collectors() {
            registry.register(collector)?;
        }
        Ok(())
    }
}
