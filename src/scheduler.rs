use log::info;

pub type TaskID = i32;

/// One unit of periodic work. Returning `false` ends the task's loop.
pub trait ScheduledTask: Send + 'static {
    fn step(&mut self) -> bool;
}

/// Runs each task on its own thread at a fixed period, with a stop channel
/// per task so a run can be bounded instead of killed.
pub struct Scheduler {
    next_task_id: TaskID,
    tasks: std::collections::HashMap<TaskID, ManagedTask>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Scheduler {
            next_task_id: 0,
            tasks: std::collections::HashMap::new(),
        }
    }

    /// Spawns `task` on a named thread, stepping it every `period`.
    ///
    /// # Panics
    ///
    /// Will panic if the thread does not spawn successfully.
    pub fn spawn<T>(&mut self, task: T, period: std::time::Duration) -> TaskID
    where
        T: ScheduledTask,
    {
        let id = self.next_task_id;

        let (stop_sender, stop_receiver) = crossbeam_channel::bounded::<()>(1);

        let handle = std::thread::Builder::new()
            .name(std::any::type_name::<T>().to_string())
            .spawn(move || {
                run_task_with_period(task, period, &stop_receiver);
            })
            .expect("Failed to spawn thread");
        self.tasks.insert(
            id,
            ManagedTask {
                handle,
                stop_sender,
            },
        );
        self.next_task_id += 1;
        id
    }

    pub fn stop_all_tasks(&self) {
        info!("Scheduler: Signaling all tasks to stop...");
        for task in self.tasks.values() {
            let _ = task.stop_sender.send(());
        }
    }

    pub fn wait_on_task_finish(&mut self, task_id: TaskID) {
        if let Some(task) = self.tasks.remove(&task_id) {
            let _ = task.handle.join();
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new()
    }
}

fn run_task_with_period<T: ScheduledTask>(
    mut task: T,
    period: std::time::Duration,
    stop_receiver: &crossbeam_channel::Receiver<()>,
) {
    let mut next_run = std::time::Instant::now();
    loop {
        if !task.step() {
            break;
        }

        next_run += period;
        let now = std::time::Instant::now();

        if next_run > now {
            let sleep_duration = next_run - now;
            // Wait for timeout (next step) OR stop signal
            match stop_receiver.recv_timeout(sleep_duration) {
                Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            }
        } else {
            // Reset drift base if a step overran the period
            log::debug!("Task running behind schedule");
            next_run = now;

            if let Ok(()) = stop_receiver.try_recv() {
                break;
            }
        }
    }
}

struct ManagedTask {
    handle: std::thread::JoinHandle<()>,
    stop_sender: crossbeam_channel::Sender<()>,
}

#[cfg(test)]
mod tests {
    use super::{ScheduledTask, Scheduler};

    // Steps a fixed number of times, then stops itself
    #[derive(Debug)]
    struct CountingTask {
        count: usize,
        limit: usize,
        sender: std::sync::mpsc::Sender<usize>,
    }

    impl CountingTask {
        fn new(limit: usize, sender: std::sync::mpsc::Sender<usize>) -> Self {
            Self {
                count: 0,
                limit,
                sender,
            }
        }
    }

    impl ScheduledTask for CountingTask {
        fn step(&mut self) -> bool {
            self.count += 1;
            self.sender.send(self.count).unwrap();
            self.count < self.limit
        }
    }

    // Steps forever until stopped externally
    #[derive(Debug)]
    struct LoopingTask {
        executions: usize,
        sender: std::sync::mpsc::Sender<usize>,
    }

    impl LoopingTask {
        fn new(sender: std::sync::mpsc::Sender<usize>) -> Self {
            Self {
                executions: 0,
                sender,
            }
        }
    }

    impl ScheduledTask for LoopingTask {
        fn step(&mut self) -> bool {
            self.executions += 1;
            self.sender.send(self.executions).unwrap();
            true
        }
    }

    #[test]
    fn when_task_stops_itself_then_all_steps_ran() {
        let mut scheduler = Scheduler::new();
        let (sender, receiver) = std::sync::mpsc::channel();

        let limit = 5;
        let task_id = scheduler.spawn(
            CountingTask::new(limit, sender),
            std::time::Duration::from_millis(10),
        );
        scheduler.wait_on_task_finish(task_id);

        assert!(scheduler.tasks.is_empty());
        let messages: Vec<usize> = receiver.try_iter().collect();
        assert_eq!(messages.len(), limit);
    }

    #[test]
    fn when_stop_all_tasks_is_called_then_looping_task_terminates() {
        let mut scheduler = Scheduler::new();
        let (counter_sender, counter_receiver) = std::sync::mpsc::channel();
        let (looper_sender, _looper_receiver) = std::sync::mpsc::channel();

        let counter_limit = 3;
        let counter_task_id = scheduler.spawn(
            CountingTask::new(counter_limit, counter_sender),
            std::time::Duration::from_millis(10),
        );
        let looping_task_id = scheduler.spawn(
            LoopingTask::new(looper_sender),
            std::time::Duration::from_millis(10),
        );

        // give ample time for the counter to finish
        std::thread::sleep(std::time::Duration::from_millis(counter_limit as u64 * 50));
        scheduler.stop_all_tasks();
        scheduler.wait_on_task_finish(counter_task_id);
        scheduler.wait_on_task_finish(looping_task_id);

        assert!(scheduler.tasks.is_empty());
        let counter_messages: Vec<usize> = counter_receiver.try_iter().collect();
        assert_eq!(counter_messages.len(), counter_limit);
    }

    #[test]
    fn when_wait_on_task_finish_is_called_then_task_id_is_removed() {
        let mut scheduler = Scheduler::new();
        let (sender, _receiver) = std::sync::mpsc::channel();

        let task_id_1 = scheduler.spawn(
            LoopingTask::new(sender.clone()),
            std::time::Duration::from_millis(50),
        );
        let task_id_2 = scheduler.spawn(
            LoopingTask::new(sender.clone()),
            std::time::Duration::from_millis(50),
        );

        assert_eq!(scheduler.tasks.len(), 2);

        scheduler.stop_all_tasks();
        scheduler.wait_on_task_finish(task_id_1);

        assert_eq!(scheduler.tasks.len(), 1);
        assert!(scheduler.tasks.contains_key(&task_id_2));
        assert!(!scheduler.tasks.contains_key(&task_id_1));

        scheduler.wait_on_task_finish(task_id_2);
        assert!(scheduler.tasks.is_empty());
    }
}
