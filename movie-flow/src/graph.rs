use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    error::{FlowError, Result},
    runner::StateSender,
    state::{PipelineState, StateUpdate},
    task::{NextAction, Task},
};

/// Type alias for edge condition functions
pub type EdgeCondition = Arc<dyn Fn(&PipelineState) -> bool + Send + Sync>;

/// Edge between tasks in the graph
#[derive(Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub condition: Option<EdgeCondition>,
}

/// A fixed graph of pipeline tasks
pub struct Graph {
    pub id: String,
    tasks: HashMap<String, Arc<dyn Task>>,
    edges: Vec<Edge>,
    start_task_id: Option<String>,
}

impl Graph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: HashMap::new(),
            edges: Vec::new(),
            start_task_id: None,
        }
    }

    /// Add a task to the graph
    pub fn add_task(&mut self, task: Arc<dyn Task>) -> &mut Self {
        let task_id = task.id().to_string();

        // The first task added is the start task unless told otherwise
        if self.tasks.is_empty() {
            self.start_task_id = Some(task_id.clone());
        }
        self.tasks.insert(task_id, task);
        self
    }

    /// Set the starting task
    pub fn set_start_task(&mut self, task_id: impl Into<String>) -> &mut Self {
        let task_id = task_id.into();
        if self.tasks.contains_key(&task_id) {
            self.start_task_id = Some(task_id);
        }
        self
    }

    /// Add an unconditional edge, taken when no conditional edge matches
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            condition: None,
        });
        self
    }

    /// Add a conditional edge between tasks
    pub fn add_conditional_edge<F>(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        condition: F,
    ) -> &mut Self
    where
        F: Fn(&PipelineState) -> bool + Send + Sync + 'static,
    {
        self.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            condition: Some(Arc::new(condition)),
        });
        self
    }

    /// Run the graph from its start task until a task ends the run or no
    /// edge leads further. Every new snapshot is sent to `updates`.
    pub async fn execute(
        &self,
        mut state: PipelineState,
        updates: Option<&StateSender>,
    ) -> Result<PipelineState> {
        let mut task_id = self.start_task_id().ok_or(FlowError::NoStartTask)?;
        let mut visited = HashSet::new();

        loop {
            if !visited.insert(task_id.clone()) {
                return Err(FlowError::TaskRevisited(task_id));
            }
            let task = self
                .get_task(&task_id)
                .ok_or_else(|| FlowError::TaskNotFound(task_id.clone()))?;

            state = state.apply(StateUpdate::new().step(task.step()))?;
            publish(updates, &state);

            debug!(graph_id = %self.id, task_id = %task_id, step = %state.current_step, "Running task");
            let result = task.run(&state).await?;

            let before = state.clone();
            state = state.apply(result.update)?;
            if state != before {
                publish(updates, &state);
            }
            if let Some(status) = &result.status_message {
                info!(task_id = %task_id, status = %status, "Task finished");
            }

            match result.next_action {
                NextAction::End => return Ok(state),
                NextAction::GoTo(target_id) => {
                    if !self.tasks.contains_key(&target_id) {
                        return Err(FlowError::TaskNotFound(target_id));
                    }
                    task_id = target_id;
                }
                NextAction::Continue => match self.find_next_task(&task_id, &state) {
                    Some(next_task_id) => task_id = next_task_id,
                    None => return Ok(state),
                },
            }
        }
    }

    /// Find the next task: the first matching conditional edge in insertion
    /// order, otherwise the default edge.
    pub fn find_next_task(&self, current_task_id: &str, state: &PipelineState) -> Option<String> {
        let outgoing = || self.edges.iter().filter(|e| e.from == current_task_id);

        outgoing()
            .find(|edge| edge.condition.as_ref().is_some_and(|condition| condition(state)))
            .or_else(|| outgoing().find(|edge| edge.condition.is_none()))
            .map(|edge| edge.to.clone())
    }

    /// Get the start task ID
    pub fn start_task_id(&self) -> Option<String> {
        self.start_task_id.clone()
    }

    /// Get a task by ID
    pub fn get_task(&self, task_id: &str) -> Option<Arc<dyn Task>> {
        self.tasks.get(task_id).cloned()
    }
}

pub(crate) fn publish(updates: Option<&StateSender>, state: &PipelineState) {
    if let Some(tx) = updates {
        // A departed subscriber does not stop the run
        if tx.send(state.clone()).is_err() {
            debug!(step = %state.current_step, "State subscriber gone, snapshot dropped");
        }
    }
}

/// Builder for creating graphs
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            graph: Graph::new(id),
        }
    }

    pub fn add_task(mut self, task: Arc<dyn Task>) -> Self {
        self.graph.add_task(task);
        self
    }

    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.graph.add_edge(from, to);
        self
    }

    pub fn add_conditional_edge<F>(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        condition: F,
    ) -> Self
    where
        F: Fn(&PipelineState) -> bool + Send + Sync + 'static,
    {
        self.graph.add_conditional_edge(from, to, condition);
        self
    }

    pub fn set_start_task(mut self, task_id: impl Into<String>) -> Self {
        self.graph.set_start_task(task_id);
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}
