//! When steps for task CRUD BDD scenarios.

use super::world::{TaskCrudWorld, ctx, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskforge::task::adapters::http::TaskChanges;

#[when(r#"a task titled "{title}" with description "{description}" is created"#)]
fn create_task(world: &mut TaskCrudWorld, title: String, description: String) {
    let result = run_async(world.service.create_task(&ctx(), title, Some(description)));
    if let Ok(ref task) = result {
        world.created = Some(task.clone());
    }
    world.record(result);
}

#[when("a task with an empty title is created")]
fn create_untitled_task(world: &mut TaskCrudWorld) {
    let result = run_async(world.service.create_task(&ctx(), "", Some("desc".to_owned())));
    world.record(result);
}

#[when("the task is updated with only completed set to true")]
fn complete_task(world: &mut TaskCrudWorld) -> Result<(), eyre::Report> {
    let mut task = world.current_task()?.clone();
    let changes = TaskChanges {
        completed: Some(true),
        ..TaskChanges::default()
    };
    changes
        .apply_to(&mut task)
        .wrap_err("merge partial update")?;
    let result = run_async(world.service.update_task(&ctx(), &task));
    world.record(result);
    Ok(())
}

#[when("the task is deleted")]
fn delete_task(world: &mut TaskCrudWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    run_async(world.service.delete_task(&ctx(), id)).wrap_err("delete task")?;
    Ok(())
}

#[when("the task is deleted again")]
fn delete_task_again(world: &mut TaskCrudWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    if let Err(err) = run_async(world.service.delete_task(&ctx(), id)) {
        world.last_error = Some(err);
    }
    Ok(())
}

#[when(r#"tasks are listed with filter "{filter}""#)]
fn list_tasks(world: &mut TaskCrudWorld, filter: String) -> Result<(), eyre::Report> {
    world.listed = run_async(world.service.list_tasks(&ctx(), &filter)).wrap_err("list tasks")?;
    Ok(())
}
