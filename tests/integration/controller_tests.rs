/*!
 * Controller workflow tests
 *
 * These run the host-side workflow with translation disabled, so no network
 * is involved: read, pipeline, write-on-success, skip/overwrite policy.
 */

use anyhow::Result;
use subsweep::app_config::Config;
use subsweep::app_controller::Controller;
use subsweep::errors::AppError;
use subsweep::file_utils::FileManager;
use crate::common;

fn plain_controller() -> Controller {
    Controller::with_config(Config::default()).expect("default config should validate")
}

/// Test processing a file whose first caption is pure spam
#[tokio::test]
async fn test_run_withSpammySubtitle_shouldWriteMergedOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_spammy_subtitle(&temp_dir.path().to_path_buf(), "movie.srt")?;

    plain_controller().run(input, None, false).await?;

    let output_path = temp_dir.path().join("movie_procesado.srt");
    assert!(FileManager::file_exists(&output_path));
    assert_eq!(
        FileManager::read_to_string(&output_path)?,
        "1\n00:00:01,000 --> 00:00:04,000\nHello there."
    );

    Ok(())
}

/// Test that a clean file passes through structurally unchanged
#[tokio::test]
async fn test_run_withCleanSubtitle_shouldPreserveCaptions() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(&temp_dir.path().to_path_buf(), "clean.srt")?;

    plain_controller().run(input.clone(), None, false).await?;

    let output = FileManager::read_to_string(temp_dir.path().join("clean_procesado.srt"))?;
    let original = FileManager::read_to_string(&input)?;
    assert_eq!(output, original.trim_end());

    Ok(())
}

/// Test the existing-output skip and force-overwrite policy
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let input = common::create_spammy_subtitle(&root, "movie.srt")?;
    let existing = common::create_test_file(&root, "movie_procesado.srt", "sentinel")?;

    let controller = plain_controller();

    controller.run(input.clone(), None, false).await?;
    assert_eq!(FileManager::read_to_string(&existing)?, "sentinel");

    controller.run(input, None, true).await?;
    assert_ne!(FileManager::read_to_string(&existing)?, "sentinel");

    Ok(())
}

/// Test that a missing input is an input error and produces no output
#[tokio::test]
async fn test_run_withMissingInput_shouldFailWithInputError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("nope.srt");

    let result = plain_controller().run(missing, None, false).await;

    assert!(matches!(result, Err(AppError::Input(_))));
    assert!(!FileManager::file_exists(temp_dir.path().join("nope_procesado.srt")));

    Ok(())
}

/// Test an explicit output directory is honored and created
#[tokio::test]
async fn test_run_withOutputDir_shouldWriteThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(&temp_dir.path().to_path_buf(), "movie.srt")?;
    let out_dir = temp_dir.path().join("processed");

    plain_controller()
        .run(input, Some(out_dir.clone()), false)
        .await?;

    assert!(FileManager::file_exists(out_dir.join("movie_procesado.srt")));

    Ok(())
}

/// Test directory batch processing over a nested tree
#[tokio::test]
async fn test_run_folder_withNestedFiles_shouldProcessAll() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::create_test_subtitle(&root, "one.srt")?;
    FileManager::ensure_dir(root.join("nested"))?;
    common::create_spammy_subtitle(&root.join("nested"), "two.srt")?;

    plain_controller().run_folder(root.clone(), None, false).await?;

    assert!(FileManager::file_exists(root.join("one_procesado.srt")));
    assert!(FileManager::file_exists(root.join("nested/two_procesado.srt")));

    Ok(())
}

/// Test that a missing input directory is an input error
#[tokio::test]
async fn test_run_folder_withMissingDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("not-there");

    let result = plain_controller().run_folder(missing, None, false).await;

    assert!(matches!(result, Err(AppError::Input(_))));

    Ok(())
}
