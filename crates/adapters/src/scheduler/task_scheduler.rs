// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows Task Scheduler adapter
//!
//! Talks to the `Schedule.Service` COM server through `ITaskService`. Each
//! session initializes COM on the calling thread and releases it on drop.
//! Off Windows, `connect` always reports the service as unavailable.

use super::{SchedulerService, ServiceError};

/// Production scheduler service
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskSchedulerService;

impl TaskSchedulerService {
    pub fn new() -> Self {
        Self
    }
}

pub use imp::TaskSchedulerSession;

impl SchedulerService for TaskSchedulerService {
    type Session = TaskSchedulerSession;

    fn connect(&self) -> Result<TaskSchedulerSession, ServiceError> {
        imp::connect()
    }
}

#[cfg(not(windows))]
mod imp {
    use crate::scheduler::{SchedulerSession, ServiceError};
    use schedctl_core::{Credentials, FolderPath, RegisteredTask, TaskDefinition};

    /// Sessions cannot be opened off Windows, so this type has no values
    pub enum TaskSchedulerSession {}

    pub(super) fn connect() -> Result<TaskSchedulerSession, ServiceError> {
        Err(ServiceError::Unavailable(
            "the Windows Task Scheduler is only available on Windows".to_string(),
        ))
    }

    impl SchedulerSession for TaskSchedulerSession {
        fn folder_exists(&self, _path: &FolderPath) -> Result<bool, ServiceError> {
            match *self {}
        }

        fn create_folder(
            &self,
            _parent: &FolderPath,
            _name: &str,
        ) -> Result<FolderPath, ServiceError> {
            match *self {}
        }

        fn register_task(
            &self,
            _folder: &FolderPath,
            _name: &str,
            _definition: &TaskDefinition,
            _credentials: &Credentials,
        ) -> Result<RegisteredTask, ServiceError> {
            match *self {}
        }

        fn get_task(
            &self,
            _folder: &FolderPath,
            _name: &str,
        ) -> Result<Option<RegisteredTask>, ServiceError> {
            match *self {}
        }

        fn run_task(&self, _folder: &FolderPath, _name: &str) -> Result<(), ServiceError> {
            match *self {}
        }

        fn delete_task(&self, _folder: &FolderPath, _name: &str) -> Result<(), ServiceError> {
            match *self {}
        }

        fn list_tasks(&self, _folder: &FolderPath) -> Result<Vec<RegisteredTask>, ServiceError> {
            match *self {}
        }
    }
}

#[cfg(windows)]
mod imp {
    #![allow(unsafe_code)]

    use crate::scheduler::ole_date::from_ole_date;
    use crate::scheduler::{SchedulerSession, ServiceError};
    use schedctl_core::{
        Credentials, FolderPath, InstancesPolicy, LogonKind, RegisteredTask, RunLevel,
        TaskDefinition, TaskState, TriggerSpec, TIME_FORMAT,
    };
    use std::mem::ManuallyDrop;
    use windows::core::{Interface, BSTR};
    use windows::Win32::Foundation::{
        RPC_E_CHANGED_MODE, S_FALSE, S_OK, VARIANT_BOOL, VARIANT_FALSE, VARIANT_TRUE,
    };
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_INPROC_SERVER,
        COINIT_MULTITHREADED,
    };
    use windows::Win32::System::TaskScheduler::{
        IDailyTrigger, IExecAction, IRegisteredTask, ITaskDefinition, ITaskFolder, ITaskService,
        ITimeTrigger, TaskScheduler as TASK_SERVICE_CLSID, TASK_ACTION_EXEC, TASK_CREATE_OR_UPDATE,
        TASK_INSTANCES_IGNORE_NEW, TASK_INSTANCES_PARALLEL, TASK_INSTANCES_POLICY,
        TASK_INSTANCES_QUEUE, TASK_INSTANCES_STOP_EXISTING, TASK_LOGON_INTERACTIVE_TOKEN,
        TASK_LOGON_PASSWORD, TASK_LOGON_SERVICE_ACCOUNT, TASK_LOGON_TYPE, TASK_RUNLEVEL_HIGHEST,
        TASK_RUNLEVEL_LUA, TASK_STATE, TASK_STATE_DISABLED, TASK_STATE_QUEUED, TASK_STATE_READY,
        TASK_STATE_RUNNING, TASK_TRIGGER_DAILY, TASK_TRIGGER_LOGON, TASK_TRIGGER_TIME,
    };
    use windows::Win32::System::Variant::{VariantClear, VARIANT, VT_BSTR, VT_I4};

    const E_FILE_NOT_FOUND: u32 = 0x8007_0002;
    const E_PATH_NOT_FOUND: u32 = 0x8007_0003;
    const E_ACCESS_DENIED: u32 = 0x8007_0005;
    const E_LOGON_FAILURE: u32 = 0x8007_052E;
    const E_LOGON_TYPE_NOT_GRANTED: u32 = 0x8007_0569;
    const E_RPC_SERVER_UNAVAILABLE: u32 = 0x8007_06BA;
    const SCHED_E_SERVICE_NOT_RUNNING: u32 = 0x8004_1315;

    fn service_error(context: &str, err: windows::core::Error) -> ServiceError {
        let message = format!("{context}: {}", err.message());
        match err.code().0 as u32 {
            E_FILE_NOT_FOUND | E_PATH_NOT_FOUND => ServiceError::NotFound(message),
            E_ACCESS_DENIED => ServiceError::AccessDenied(message),
            E_LOGON_FAILURE | E_LOGON_TYPE_NOT_GRANTED => ServiceError::LogonFailure(message),
            E_RPC_SERVER_UNAVAILABLE | SCHED_E_SERVICE_NOT_RUNNING => {
                ServiceError::Unavailable(message)
            }
            _ => ServiceError::Rejected(message),
        }
    }

    fn is_not_found(err: &windows::core::Error) -> bool {
        matches!(err.code().0 as u32, E_FILE_NOT_FOUND | E_PATH_NOT_FOUND)
    }

    /// Balances a successful `CoInitializeEx`
    struct ComApartment(bool);

    impl Drop for ComApartment {
        fn drop(&mut self) {
            if self.0 {
                unsafe { CoUninitialize() }
            }
        }
    }

    /// VARIANT cleared on drop
    struct OwnedVariant(VARIANT);

    impl OwnedVariant {
        fn empty() -> Self {
            Self(VARIANT::default())
        }

        fn bstr(value: &str) -> Self {
            let mut variant = VARIANT::default();
            unsafe {
                let inner = &mut *variant.Anonymous.Anonymous;
                inner.vt = VT_BSTR;
                inner.Anonymous.bstrVal = ManuallyDrop::new(BSTR::from(value));
            }
            Self(variant)
        }

        fn optional_bstr(value: Option<&str>) -> Self {
            value.map_or_else(Self::empty, Self::bstr)
        }

        fn index(value: i32) -> Self {
            let mut variant = VARIANT::default();
            unsafe {
                let inner = &mut *variant.Anonymous.Anonymous;
                inner.vt = VT_I4;
                inner.Anonymous.lVal = value;
            }
            Self(variant)
        }

        fn as_ref(&self) -> &VARIANT {
            &self.0
        }
    }

    impl Drop for OwnedVariant {
        fn drop(&mut self) {
            unsafe {
                let _ = VariantClear(&mut self.0);
            }
        }
    }

    fn flag(value: bool) -> VARIANT_BOOL {
        if value {
            VARIANT_TRUE
        } else {
            VARIANT_FALSE
        }
    }

    fn bstr(value: impl AsRef<str>) -> BSTR {
        BSTR::from(value.as_ref())
    }

    pub(super) fn connect() -> Result<TaskSchedulerSession, ServiceError> {
        unsafe {
            let hr = CoInitializeEx(None, COINIT_MULTITHREADED);
            let did_init = if hr == S_OK || hr == S_FALSE {
                true
            } else if hr == RPC_E_CHANGED_MODE {
                // Already initialized with another model; leave it alone.
                false
            } else {
                return Err(ServiceError::Unavailable(format!(
                    "COM init failed: 0x{:08x}",
                    hr.0 as u32
                )));
            };
            let apartment = ComApartment(did_init);

            let service: ITaskService =
                CoCreateInstance(&TASK_SERVICE_CLSID, None, CLSCTX_INPROC_SERVER).map_err(|e| {
                    ServiceError::Unavailable(format!("CoCreateInstance(TaskScheduler) failed: {}", e.message()))
                })?;
            let empty = VARIANT::default();
            service
                .Connect(&empty, &empty, &empty, &empty)
                .map_err(|e| match service_error("ITaskService::Connect failed", e) {
                    ServiceError::AccessDenied(m) => ServiceError::AccessDenied(m),
                    other => ServiceError::Unavailable(other.to_string()),
                })?;

            Ok(TaskSchedulerSession {
                service,
                _apartment: apartment,
            })
        }
    }

    /// Connected `ITaskService`.
    ///
    /// Field order matters: the service is released before COM is uninitialized.
    pub struct TaskSchedulerSession {
        service: ITaskService,
        _apartment: ComApartment,
    }

    impl TaskSchedulerSession {
        fn folder(&self, path: &FolderPath) -> Result<ITaskFolder, ServiceError> {
            unsafe {
                self.service
                    .GetFolder(&bstr(path.to_string()))
                    .map_err(|e| service_error(&format!("GetFolder({path}) failed"), e))
            }
        }

        fn task(&self, folder: &FolderPath, name: &str) -> Result<Option<IRegisteredTask>, ServiceError> {
            let handle = self.folder(folder)?;
            unsafe {
                match handle.GetTask(&bstr(name)) {
                    Ok(task) => Ok(Some(task)),
                    Err(e) if is_not_found(&e) => Ok(None),
                    Err(e) => Err(service_error(
                        &format!("GetTask({}) failed", folder.task_path(name)),
                        e,
                    )),
                }
            }
        }
    }

    impl SchedulerSession for TaskSchedulerSession {
        fn folder_exists(&self, path: &FolderPath) -> Result<bool, ServiceError> {
            let (Some(parent), Some(name)) = (path.parent(), path.name()) else {
                return Ok(true);
            };
            let parent_handle = match self.folder(&parent) {
                Ok(handle) => handle,
                Err(ServiceError::NotFound(_)) => return Ok(false),
                Err(e) => return Err(e),
            };

            unsafe {
                let children = parent_handle
                    .GetFolders(0)
                    .map_err(|e| service_error(&format!("GetFolders({parent}) failed"), e))?;
                let count = children
                    .Count()
                    .map_err(|e| service_error("ITaskFolderCollection::Count failed", e))?;
                for index in 1..=count {
                    let child = children
                        .get_Item(OwnedVariant::index(index).as_ref())
                        .map_err(|e| service_error("ITaskFolderCollection::Item failed", e))?;
                    let child_name = child
                        .Name()
                        .map_err(|e| service_error("ITaskFolder::Name failed", e))?;
                    // Folder names are case-insensitive.
                    if child_name.to_string().to_lowercase() == name.to_lowercase() {
                        return Ok(true);
                    }
                }
            }
            Ok(false)
        }

        fn create_folder(&self, parent: &FolderPath, name: &str) -> Result<FolderPath, ServiceError> {
            let path = parent
                .join(name)
                .map_err(|e| ServiceError::Rejected(e.to_string()))?;
            let parent_handle = self.folder(parent)?;
            unsafe {
                parent_handle
                    .CreateFolder(&bstr(name), OwnedVariant::empty().as_ref())
                    .map_err(|e| service_error(&format!("CreateFolder({path}) failed"), e))?;
            }
            Ok(path)
        }

        fn register_task(
            &self,
            folder: &FolderPath,
            name: &str,
            definition: &TaskDefinition,
            credentials: &Credentials,
        ) -> Result<RegisteredTask, ServiceError> {
            let handle = self.folder(folder)?;
            unsafe {
                let task = self
                    .service
                    .NewTask(0)
                    .map_err(|e| service_error("NewTask failed", e))?;
                apply_definition(&task, definition, credentials)?;

                let user = OwnedVariant::optional_bstr(credentials.user_id());
                let password = OwnedVariant::optional_bstr(credentials.password());
                let sddl = OwnedVariant::empty();
                let registered = handle
                    .RegisterTaskDefinition(
                        &bstr(name),
                        &task,
                        TASK_CREATE_OR_UPDATE.0,
                        user.as_ref(),
                        password.as_ref(),
                        logon_type(credentials.logon_kind()),
                        sddl.as_ref(),
                    )
                    .map_err(|e| {
                        service_error(
                            &format!("RegisterTaskDefinition({}) failed", folder.task_path(name)),
                            e,
                        )
                    })?;
                read_task(&registered)
            }
        }

        fn get_task(
            &self,
            folder: &FolderPath,
            name: &str,
        ) -> Result<Option<RegisteredTask>, ServiceError> {
            self.task(folder, name)?
                .map(|task| unsafe { read_task(&task) })
                .transpose()
        }

        fn run_task(&self, folder: &FolderPath, name: &str) -> Result<(), ServiceError> {
            let task = self
                .task(folder, name)?
                .ok_or_else(|| ServiceError::NotFound(folder.task_path(name)))?;
            unsafe {
                task.Run(OwnedVariant::empty().as_ref())
                    .map_err(|e| service_error(&format!("Run({}) failed", folder.task_path(name)), e))?;
            }
            Ok(())
        }

        fn delete_task(&self, folder: &FolderPath, name: &str) -> Result<(), ServiceError> {
            let handle = self.folder(folder)?;
            unsafe {
                handle.DeleteTask(&bstr(name), 0).map_err(|e| {
                    service_error(&format!("DeleteTask({}) failed", folder.task_path(name)), e)
                })
            }
        }

        fn list_tasks(&self, folder: &FolderPath) -> Result<Vec<RegisteredTask>, ServiceError> {
            let handle = self.folder(folder)?;
            unsafe {
                let tasks = handle
                    .GetTasks(0)
                    .map_err(|e| service_error(&format!("GetTasks({folder}) failed"), e))?;
                let count = tasks
                    .Count()
                    .map_err(|e| service_error("IRegisteredTaskCollection::Count failed", e))?;
                let mut records = Vec::with_capacity(count.max(0) as usize);
                for index in 1..=count {
                    let task = tasks
                        .get_Item(OwnedVariant::index(index).as_ref())
                        .map_err(|e| service_error("IRegisteredTaskCollection::Item failed", e))?;
                    records.push(read_task(&task)?);
                }
                Ok(records)
            }
        }
    }

    fn logon_type(kind: LogonKind) -> TASK_LOGON_TYPE {
        match kind {
            LogonKind::Interactive => TASK_LOGON_INTERACTIVE_TOKEN,
            LogonKind::Password => TASK_LOGON_PASSWORD,
            LogonKind::ServiceAccount => TASK_LOGON_SERVICE_ACCOUNT,
        }
    }

    fn instances_policy(policy: InstancesPolicy) -> TASK_INSTANCES_POLICY {
        match policy {
            InstancesPolicy::Parallel => TASK_INSTANCES_PARALLEL,
            InstancesPolicy::Queue => TASK_INSTANCES_QUEUE,
            InstancesPolicy::IgnoreNew => TASK_INSTANCES_IGNORE_NEW,
            InstancesPolicy::StopExisting => TASK_INSTANCES_STOP_EXISTING,
        }
    }

    fn task_state(state: TASK_STATE) -> TaskState {
        match state {
            TASK_STATE_DISABLED => TaskState::Disabled,
            TASK_STATE_QUEUED => TaskState::Queued,
            TASK_STATE_READY => TaskState::Ready,
            TASK_STATE_RUNNING => TaskState::Running,
            _ => TaskState::Unknown,
        }
    }

    unsafe fn apply_definition(
        task: &ITaskDefinition,
        definition: &TaskDefinition,
        credentials: &Credentials,
    ) -> Result<(), ServiceError> {
        let info = task
            .RegistrationInfo()
            .map_err(|e| service_error("RegistrationInfo failed", e))?;
        info.SetDescription(&bstr(&definition.registration.description))
            .map_err(|e| service_error("SetDescription failed", e))?;
        info.SetAuthor(&bstr(&definition.registration.author))
            .map_err(|e| service_error("SetAuthor failed", e))?;

        let settings = task
            .Settings()
            .map_err(|e| service_error("Settings failed", e))?;
        let s = &definition.settings;
        settings
            .SetEnabled(flag(s.enabled))
            .map_err(|e| service_error("SetEnabled failed", e))?;
        settings
            .SetStartWhenAvailable(flag(s.start_when_available))
            .map_err(|e| service_error("SetStartWhenAvailable failed", e))?;
        settings
            .SetHidden(flag(s.hidden))
            .map_err(|e| service_error("SetHidden failed", e))?;
        settings
            .SetRunOnlyIfIdle(flag(s.run_only_if_idle))
            .map_err(|e| service_error("SetRunOnlyIfIdle failed", e))?;
        settings
            .SetWakeToRun(flag(s.wake_to_run))
            .map_err(|e| service_error("SetWakeToRun failed", e))?;
        settings
            .SetMultipleInstances(instances_policy(s.multiple_instances))
            .map_err(|e| service_error("SetMultipleInstances failed", e))?;

        let principal = task
            .Principal()
            .map_err(|e| service_error("Principal failed", e))?;
        let run_level = match definition.principal.run_level {
            RunLevel::Highest => TASK_RUNLEVEL_HIGHEST,
            RunLevel::Standard => TASK_RUNLEVEL_LUA,
        };
        principal
            .SetRunLevel(run_level)
            .map_err(|e| service_error("SetRunLevel failed", e))?;
        principal
            .SetLogonType(logon_type(definition.principal.logon))
            .map_err(|e| service_error("SetLogonType failed", e))?;
        if let Some(user) = credentials.user_id() {
            principal
                .SetUserId(&bstr(user))
                .map_err(|e| service_error("SetUserId failed", e))?;
        }

        let action: IExecAction = task
            .Actions()
            .and_then(|actions| actions.Create(TASK_ACTION_EXEC))
            .and_then(|action| action.cast())
            .map_err(|e| service_error("create exec action failed", e))?;
        let exec = &definition.action;
        action
            .SetPath(&bstr(exec.path.to_string_lossy()))
            .map_err(|e| service_error("SetPath failed", e))?;
        action
            .SetArguments(&bstr(&exec.arguments))
            .map_err(|e| service_error("SetArguments failed", e))?;
        if let Some(dir) = &exec.working_dir {
            action
                .SetWorkingDirectory(&bstr(dir.to_string_lossy()))
                .map_err(|e| service_error("SetWorkingDirectory failed", e))?;
        }

        let Some(trigger) = &definition.trigger else {
            return Ok(());
        };
        let triggers = task
            .Triggers()
            .map_err(|e| service_error("Triggers failed", e))?;
        match trigger {
            TriggerSpec::Daily { start_boundary } => {
                let daily: IDailyTrigger = triggers
                    .Create(TASK_TRIGGER_DAILY)
                    .and_then(|t| t.cast())
                    .map_err(|e| service_error("create daily trigger failed", e))?;
                daily
                    .SetDaysInterval(1)
                    .map_err(|e| service_error("SetDaysInterval failed", e))?;
                daily
                    .SetStartBoundary(&bstr(start_boundary.format(TIME_FORMAT).to_string()))
                    .map_err(|e| service_error("SetStartBoundary failed", e))?;
            }
            TriggerSpec::Once { run_at } => {
                let once: ITimeTrigger = triggers
                    .Create(TASK_TRIGGER_TIME)
                    .and_then(|t| t.cast())
                    .map_err(|e| service_error("create time trigger failed", e))?;
                once.SetStartBoundary(&bstr(run_at.format(TIME_FORMAT).to_string()))
                    .map_err(|e| service_error("SetStartBoundary failed", e))?;
            }
            TriggerSpec::Logon => {
                triggers
                    .Create(TASK_TRIGGER_LOGON)
                    .map_err(|e| service_error("create logon trigger failed", e))?;
            }
        }
        Ok(())
    }

    unsafe fn read_task(task: &IRegisteredTask) -> Result<RegisteredTask, ServiceError> {
        let name = task
            .Name()
            .map_err(|e| service_error("IRegisteredTask::Name failed", e))?;
        let path = task
            .Path()
            .map_err(|e| service_error("IRegisteredTask::Path failed", e))?;
        let state = task
            .State()
            .map(task_state)
            .unwrap_or(TaskState::Unknown);
        let next_run_time = task.NextRunTime().ok().and_then(from_ole_date);

        Ok(RegisteredTask {
            name: name.to_string(),
            path: path.to_string(),
            state,
            next_run_time,
        })
    }
}

#[cfg(test)]
#[path = "task_scheduler_tests.rs"]
mod tests;
